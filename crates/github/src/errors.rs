use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("{0} {1}")]
    HTTP(u16, String),

    #[error("Error in the request: {0}")]
    GenericError(String),

    #[error("Unexpected payload from `{endpoint}`: {reason}")]
    UnexpectedPayload { endpoint: String, reason: String },

    #[error("GitHub rate limit exhausted: {0}")]
    RateLimited(String),

    #[error("Failed to parse url")]
    UrlParsing,
}

impl ApiError {
    pub(crate) fn unexpected(endpoint: &str, reason: impl ToString) -> Self {
        Self::UnexpectedPayload {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}
