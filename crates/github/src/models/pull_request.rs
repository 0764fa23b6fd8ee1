use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{login_or_ghost, User};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PullRequestState {
    Open,
    Closed,
}

/// The subset of a GitHub pull request shared by the `pulls` and
/// `commits/{sha}/pulls` endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: PullRequestState,
    pub user: Option<User>,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub base: GitRef,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub reference: String,
    pub sha: String,
}

impl PullRequest {
    pub fn author(&self) -> &str {
        login_or_ghost(&self.user)
    }

    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    pub fn targets(&self, branch: &str) -> bool {
        self.base.reference == branch
    }
}
