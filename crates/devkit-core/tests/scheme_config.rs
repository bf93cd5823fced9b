mod support;

use std::fs;

use tempfile::TempDir;

use devkit_core::locator::{GitConfigSource, NameResolver, SchemeRegistry, SchemeRule};

use support::git::add_instead_of;

#[test]
fn rules_load_from_config_file_in_order() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("gitconfig");
    add_instead_of(&config, "https://github.com/", "gh://");
    add_instead_of(&config, "https://gist.github.com/", "gist://");

    let registry = SchemeRegistry::new(GitConfigSource::from_file(&config));
    let rules = registry.rules().unwrap();

    assert_eq!(
        rules,
        [
            SchemeRule::new("gh://", "https://github.com/"),
            SchemeRule::new("gist://", "https://gist.github.com/"),
        ]
    );
}

#[test]
fn empty_config_has_no_rules() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("gitconfig");
    fs::write(&config, "").unwrap();

    let registry = SchemeRegistry::new(GitConfigSource::from_file(&config));
    assert!(registry.rules().unwrap().is_empty());
    assert!(registry.lookup("gh://jaraco/keyring").unwrap().is_null());
}

#[test]
fn reload_picks_up_new_rules() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("gitconfig");
    add_instead_of(&config, "https://github.com/", "gh://");

    let mut registry = SchemeRegistry::new(GitConfigSource::from_file(&config));
    assert_eq!(registry.rules().unwrap().len(), 1);

    add_instead_of(&config, "https://gitlab.com/", "gl://");
    assert_eq!(registry.rules().unwrap().len(), 1);
    assert_eq!(registry.reload().unwrap().len(), 2);
}

#[test]
fn resolver_applies_configured_schemes() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("gitconfig");
    add_instead_of(&config, "https://github.com/", "gh://");

    let registry = SchemeRegistry::new(GitConfigSource::from_file(&config));
    let resolver = NameResolver::new("https://github.com/", "jaraco", registry);

    assert_eq!(
        resolver.resolve("keyring").unwrap().as_str(),
        "gh://jaraco/keyring"
    );
    assert_eq!(
        resolver.resolve_full("pypa/setuptools").unwrap().as_str(),
        "https://github.com/pypa/setuptools"
    );
}
