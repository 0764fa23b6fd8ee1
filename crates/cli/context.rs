use config::Config;
use github::GithubClient;
use release_status::{models::ParseRepoError, TrackedRepo};
use slack::SlackClient;

use crate::errors::RunError;

pub fn tracked_repositories(names: &[String]) -> Result<Vec<TrackedRepo>, ParseRepoError> {
    names.iter().map(|name| name.parse::<TrackedRepo>()).collect()
}

/// Clients and inputs of a single run. Built fresh for every request so runs
/// never share a connection pool or any other state.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub github: GithubClient,
    pub slack: SlackClient,
    pub repositories: Vec<TrackedRepo>,
}

impl RunContext {
    pub fn new(config: &Config, repositories: Vec<TrackedRepo>) -> Result<Self, RunError> {
        let github = GithubClient::new(
            &config.github_api_url,
            &config.github_owner,
            config.github_token.clone(),
        )?;

        let slack = SlackClient::new(&config.slack_api_url, config.slack_token.clone())
            .map_err(RunError::Slack)?;

        Ok(Self {
            github,
            slack,
            repositories,
        })
    }
}
