//! Create a hosted release for a project tag.

use crate::github::{GitHubClient, Release};
use crate::locator::NameResolver;

#[derive(Debug)]
pub struct ReleaseCommand<'a> {
    resolver: &'a NameResolver,
    client: &'a GitHubClient,
}

impl<'a> ReleaseCommand<'a> {
    pub fn new(resolver: &'a NameResolver, client: &'a GitHubClient) -> Self {
        Self { resolver, client }
    }

    /// `owner/repo` path the release is created under.
    pub fn repo_for(&self, project: &str) -> anyhow::Result<String> {
        self.resolver.repo_path(project)
    }

    pub async fn execute(&self, project: &str, tag: &str) -> anyhow::Result<Release> {
        let repo = self.repo_for(project)?;
        self.client.create_release(&repo, tag).await
    }
}
