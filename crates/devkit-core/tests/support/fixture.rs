use std::fs;
use std::path::{Path, PathBuf};

use git2::{IndexAddOption, Repository, Signature};
use tempfile::TempDir;
use url::Url;

use devkit_core::locator::{NameResolver, SchemeRegistry};

pub fn commit_all(repo: &Repository, message: &str) -> git2::Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let sig = Signature::now("Devkit Test", "devkit@example.com").unwrap();
    match repo.head() {
        Ok(head) => {
            let parent = repo.find_commit(head.target().unwrap()).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])
                .unwrap()
        }
        Err(_) => repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[])
            .unwrap(),
    }
}

/// Create `<host>/<owner>/<name>` with the given files in one commit.
pub fn create_repo(host: &Path, owner: &str, name: &str, files: &[(&str, &str)]) -> Repository {
    let dir = host.join(owner).join(name);
    fs::create_dir_all(&dir).unwrap();
    let repo = Repository::init(&dir).unwrap();
    for (file, contents) in files {
        fs::write(dir.join(file), contents).unwrap();
    }
    commit_all(&repo, "initial");
    repo
}

/// A host directory holding `alice/widget` with one commit.
pub fn create_fixture_host() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let host = temp.path().join("host");
    create_repo(&host, "alice", "widget", &[("README.rst", "widget\n")]);
    (temp, host)
}

/// Resolver for `owner` on a `file://` host with no scheme rules.
pub fn create_resolver(host: &Path, owner: &str) -> NameResolver {
    let url = Url::from_directory_path(host).unwrap();
    NameResolver::new(url, owner, SchemeRegistry::with_rules(Vec::new()))
}
