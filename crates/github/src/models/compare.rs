use serde::{Deserialize, Serialize};

use super::{login_or_ghost, User};

/// Result of `compare/{base}...{head}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Comparison {
    pub ahead_by: u64,
    pub commits: Vec<CompareCommit>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompareCommit {
    pub sha: String,
    pub author: Option<User>,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommitDetail {
    pub message: String,
}

impl CompareCommit {
    pub fn author_login(&self) -> &str {
        login_or_ghost(&self.author)
    }
}
