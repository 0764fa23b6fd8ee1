use serde::{Deserialize, Serialize};

pub mod branch;
pub mod compare;
pub mod pull_request;
pub mod review;
pub mod tag;

/// Login shown for content whose author account no longer exists.
pub const GHOST_LOGIN: &str = "ghost";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct User {
    pub login: String,
}

pub(crate) fn login_or_ghost(user: &Option<User>) -> &str {
    user.as_ref()
        .map(|u| u.login.as_str())
        .unwrap_or(GHOST_LOGIN)
}
