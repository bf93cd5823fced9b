//! Tests for the filter module.

use super::*;
use crate::project::{ProjectList, ProjectSpec};

fn sample_projects() -> ProjectList {
    ProjectList::parse(
        "/pmxbot/pmxbot.nsfw\n\
         /pypa/setuptools [lifted]\n\
         /python/cpython [fork]\n\
         jaraco.develop\n\
         keyring [lifted]\n\
         keyrings.firefox\n",
    )
    .unwrap()
}

fn names<'a>(projects: impl Iterator<Item = &'a ProjectSpec>) -> Vec<&'a str> {
    projects.map(ProjectSpec::name).collect()
}

mod selector_tests {
    use super::*;

    #[test]
    fn plain_text_is_selecting() {
        let selector = Selector::keyword("keyring");
        assert_eq!(selector.mode(), SelectorMode::Selecting);
        assert!(!selector.is_negated());
        assert_eq!(selector.indicator(), "keyring");
    }

    #[test]
    fn negation_marker_is_excluding() {
        let selector = Selector::keyword("not keyring");
        assert_eq!(selector.mode(), SelectorMode::Excluding);
        assert!(selector.is_negated());
        assert_eq!(selector.indicator(), "keyring");
        assert_eq!(selector.raw(), "not keyring");
    }

    #[test]
    fn double_negation_keeps_stray_marker() {
        let selector = Selector::keyword("not not keyring");
        assert_eq!(selector.mode(), SelectorMode::Excluding);
        assert_eq!(selector.indicator(), "not keyring");

        // The leftover marker is matched literally, so an ordinary name
        // does not contain it and the exclusion holds.
        assert!(selector.matches(&ProjectSpec::new("keyring")));
        assert!(!selector.matches(&ProjectSpec::new("why not keyring")));
    }

    #[test]
    fn marker_without_trailing_space_is_literal() {
        let selector = Selector::keyword("notebook");
        assert_eq!(selector.mode(), SelectorMode::Selecting);
        assert_eq!(selector.indicator(), "notebook");
    }

    #[test]
    fn keyword_matches_substring() {
        let selector = Selector::keyword("ring");
        assert!(selector.matches(&ProjectSpec::new("keyring")));
        assert!(!selector.matches(&ProjectSpec::new("jaraco.develop")));
    }

    #[test]
    fn excluding_keyword_inverts() {
        let selector = Selector::keyword("not keyrings");
        assert!(selector.matches(&ProjectSpec::new("keyring")));
        assert!(!selector.matches(&ProjectSpec::new("keyrings.firefox")));
    }

    #[test]
    fn tag_matches_membership_not_substring() {
        let project = ProjectSpec::new("cpython").with_tags(["fork"]);
        assert!(Selector::tag("fork").matches(&project));
        assert!(!Selector::tag("for").matches(&project));
        assert!(!Selector::tag("not fork").matches(&project));
        assert!(Selector::tag("not lifted").matches(&project));
    }

    #[test]
    fn tag_selector_ignores_name() {
        let project = ProjectSpec::new("fork");
        assert!(!Selector::tag("fork").matches(&project));
    }
}

mod group_tests {
    use super::*;

    #[test]
    fn empty_group_admits_everything() {
        let group = SelectorGroup::default();
        let projects = sample_projects();
        assert!(projects.iter().all(|p| group.evaluate(p)));
    }

    #[test]
    fn keyword_with_exclusion() {
        let group = SelectorGroup::new([
            Selector::keyword("keyring"),
            Selector::keyword("not keyrings"),
        ]);

        assert!(group.evaluate(&ProjectSpec::new("keyring")));
        assert!(!group.evaluate(&ProjectSpec::new("jaraco.develop")));
        assert!(!group.evaluate(&ProjectSpec::new("keyrings.firefox")));
    }

    #[test]
    fn selecting_selectors_combine_with_or() {
        let group =
            SelectorGroup::from_raw(["keyring", "develop", "not keyrings"], [] as [&str; 0]);
        let projects = sample_projects();

        let mut selected = names(projects.select(&group));
        selected.sort();
        assert_eq!(selected, vec!["jaraco.develop", "keyring"]);
    }

    #[test]
    fn keywords_and_tags_together() {
        let group = SelectorGroup::from_raw(["py"], ["fork", "not lifted"]);
        let projects = sample_projects();

        assert_eq!(names(projects.select(&group)), vec!["/python/cpython"]);
    }

    #[test]
    fn only_excluding_selectors_admit_the_rest() {
        let group = SelectorGroup::from_raw(["not keyring"], ["not fork"]);
        let projects = sample_projects();

        assert_eq!(
            names(projects.select(&group)),
            vec!["/pmxbot/pmxbot.nsfw", "/pypa/setuptools", "jaraco.develop"]
        );
    }

    #[test]
    fn exclusion_is_applied_once() {
        // A doubly-inverted exclusion would admit only the excluded project.
        let group = SelectorGroup::new([Selector::tag("not lifted")]);
        let projects = sample_projects();

        let selected = names(projects.select(&group));
        assert!(!selected.contains(&"keyring"));
        assert!(!selected.contains(&"/pypa/setuptools"));
        assert_eq!(selected.len(), 4);
    }

    #[test]
    fn filter_preserves_input_order() {
        let group = SelectorGroup::from_raw(["o"], [] as [&str; 0]);
        let projects = sample_projects();

        assert_eq!(
            names(group.filter(projects.iter())),
            vec![
                "/pmxbot/pmxbot.nsfw",
                "/pypa/setuptools",
                "/python/cpython",
                "jaraco.develop",
                "keyrings.firefox",
            ]
        );
    }
}
