use config::ConfigError;
use github::errors::ApiError;
use release_status::models::ParseRepoError;
use thiserror::Error;

/// Failures that end a run. Each maps to a process exit status.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Repository(#[from] ParseRepoError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Slack client error: {0}")]
    Slack(color_eyre::Report),

    #[error("Failed to serialize report: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl RunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Repository(_) => 1,
            Self::Api(ApiError::RateLimited(_)) => 3,
            Self::Api(ApiError::UnexpectedPayload { .. }) => 255,
            Self::Api(_) | Self::Slack(_) | Self::Output(_) | Self::Server(_) => 2,
        }
    }
}

#[cfg(test)]
mod test {
    use config::EnvVar;

    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_category() {
        assert_eq!(RunError::from(ConfigError::Missing(EnvVar::GithubToken)).exit_code(), 1);
        assert_eq!(RunError::from(ApiError::RateLimited("x".into())).exit_code(), 3);
        assert_eq!(
            RunError::from(ApiError::UnexpectedPayload {
                endpoint: "pulls".into(),
                reason: "bad".into()
            })
            .exit_code(),
            255
        );
        assert_eq!(RunError::from(ApiError::HTTP(502, "".into())).exit_code(), 2);
    }
}
