//! Tests for the git module.

use super::*;

mod clone_options_tests {
    use super::*;

    #[test]
    fn empty_options_render_no_args() {
        assert!(CloneOptions::new().to_args().is_empty());
    }

    #[test]
    fn depth_and_quiet() {
        let options = CloneOptions::new().with_depth(50).with_quiet(true);
        assert_eq!(options.to_args(), vec!["--depth", "50", "--quiet"]);
    }

    #[test]
    fn branch_comes_last() {
        let options = CloneOptions::new().with_branch("main").with_depth(1);
        assert_eq!(options.to_args(), vec!["--depth", "1", "--branch", "main"]);
    }
}

mod target_tests {
    use super::*;
    use std::path::Path;

    use crate::locator::{DEFAULT_HOST, NameResolver, SchemeRegistry, SchemeRule};
    use crate::project::ProjectSpec;

    fn create_test_resolver() -> NameResolver {
        NameResolver::new(
            DEFAULT_HOST,
            "jaraco",
            SchemeRegistry::with_rules(vec![SchemeRule::new("gh://", "https://github.com/")]),
        )
    }

    #[test]
    fn target_for_root_uses_owner() {
        let resolver = create_test_resolver();
        let checkout = Checkout::new(&resolver);
        let root = Path::new("/src");

        assert_eq!(
            checkout
                .target_for_root(&ProjectSpec::new("keyring"), root)
                .unwrap(),
            root.join("jaraco")
        );
        assert_eq!(
            checkout
                .target_for_root(&ProjectSpec::new("/python/cpython"), root)
                .unwrap(),
            root.join("python")
        );
    }

    #[test]
    fn exists_checks_repo_directory() {
        let resolver = create_test_resolver();
        let checkout = Checkout::new(&resolver);
        let temp = tempfile::TempDir::new().unwrap();
        let project = ProjectSpec::new("/pypa/setuptools");

        assert!(!checkout.exists(&project, temp.path()).unwrap());
        std::fs::create_dir(temp.path().join("setuptools")).unwrap();
        assert!(checkout.exists(&project, temp.path()).unwrap());
    }
}
