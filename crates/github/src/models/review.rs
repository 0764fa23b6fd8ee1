use serde::{Deserialize, Serialize};

use super::{login_or_ghost, User};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Review {
    pub user: Option<User>,
    pub state: ReviewState,
}

impl Review {
    pub fn reviewer(&self) -> &str {
        login_or_ghost(&self.user)
    }
}
