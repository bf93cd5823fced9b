//! Push the topics listed for each project to its hosted repository.

use serde::Serialize;

use crate::github::GitHubClient;
use crate::locator::NameResolver;
use crate::project::ProjectSpec;

#[derive(Debug, Clone, Serialize)]
pub struct TopicsUpdate {
    pub project: String,
    pub repo: String,
    /// Topics on the repository after the update
    pub topics: Vec<String>,
}

/// Report from a topics sync
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopicsReport {
    pub updated: Vec<TopicsUpdate>,
    /// Projects listed without topics
    pub skipped: Vec<String>,
}

#[derive(Debug)]
pub struct TopicsCommand<'a> {
    resolver: &'a NameResolver,
    client: &'a GitHubClient,
}

impl<'a> TopicsCommand<'a> {
    pub fn new(resolver: &'a NameResolver, client: &'a GitHubClient) -> Self {
        Self { resolver, client }
    }

    pub async fn execute<'p>(
        &self,
        projects: impl IntoIterator<Item = &'p ProjectSpec>,
    ) -> anyhow::Result<TopicsReport> {
        let mut report = TopicsReport::default();
        for project in projects {
            if project.topics().is_empty() {
                report.skipped.push(project.name().to_string());
                continue;
            }
            let repo = self.resolver.repo_path(project.name())?;
            let topics = self.client.add_topics(&repo, project.topics()).await?;
            report.updated.push(TopicsUpdate {
                project: project.name().to_string(),
                repo,
                topics,
            });
        }
        Ok(report)
    }
}
