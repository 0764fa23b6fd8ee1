use std::net::SocketAddr;

use secrecy::SecretString;
use thiserror::Error;

pub const DEFAULT_GITHUB_OWNER: &str = "ansible";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";
pub const DEFAULT_REPOSITORIES: &str = "tower";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Copy, strum::Display, strum::AsRefStr)]
pub enum EnvVar {
    #[strum(serialize = "SLACK_BOT_TOKEN")]
    SlackBotToken,
    #[strum(serialize = "GH_TOKEN")]
    GithubToken,
    #[strum(serialize = "GITHUB_OWNER")]
    GithubOwner,
    #[strum(serialize = "GITHUB_API_URL")]
    GithubApiUrl,
    #[strum(serialize = "SLACK_API_URL")]
    SlackApiUrl,
    #[strum(serialize = "RELNOTIFY_REPOS")]
    Repositories,
    #[strum(serialize = "RELNOTIFY_BIND")]
    Bind,
}

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Missing environment token setting: {0}")]
    Missing(EnvVar),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: EnvVar, reason: String },
}

/// Everything a run needs, read once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub slack_token: SecretString,
    pub github_token: SecretString,
    pub github_owner: String,
    pub github_api_url: String,
    pub slack_api_url: String,
    /// Tracked repositories as written, e.g. `tower` or `awx:devel`.
    pub repositories: Vec<String>,
    pub bind: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: EnvVar| lookup(var.as_ref()).filter(|v| !v.trim().is_empty());
        let required = |var: EnvVar| get(var).ok_or(ConfigError::Missing(var));
        let or_default = |var: EnvVar, default: &str| get(var).unwrap_or_else(|| default.into());

        let slack_token = SecretString::from(required(EnvVar::SlackBotToken)?);
        let github_token = SecretString::from(required(EnvVar::GithubToken)?);

        let repositories: Vec<String> = or_default(EnvVar::Repositories, DEFAULT_REPOSITORIES)
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        if repositories.is_empty() {
            return Err(ConfigError::Invalid {
                var: EnvVar::Repositories,
                reason: "no repositories listed".into(),
            });
        }

        let bind = or_default(EnvVar::Bind, DEFAULT_BIND)
            .parse::<SocketAddr>()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: EnvVar::Bind,
                reason: e.to_string(),
            })?;

        Ok(Self {
            slack_token,
            github_token,
            github_owner: or_default(EnvVar::GithubOwner, DEFAULT_GITHUB_OWNER),
            github_api_url: or_default(EnvVar::GithubApiUrl, DEFAULT_GITHUB_API_URL),
            slack_api_url: or_default(EnvVar::SlackApiUrl, DEFAULT_SLACK_API_URL),
            repositories,
            bind,
        })
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let vars = lookup(&[("SLACK_BOT_TOKEN", "xoxb"), ("GH_TOKEN", "ghp")]);
        let config = Config::from_lookup(vars).unwrap();

        assert_eq!(config.github_token.expose_secret(), "ghp");
        assert_eq!(config.github_owner, "ansible");
        assert_eq!(config.repositories, vec!["tower".to_string()]);
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.github_api_url, DEFAULT_GITHUB_API_URL);
    }

    #[test]
    fn missing_tokens_are_fatal() {
        let err = Config::from_lookup(lookup(&[("SLACK_BOT_TOKEN", "xoxb")])).unwrap_err();

        assert!(matches!(err, ConfigError::Missing(EnvVar::GithubToken)));
        assert_eq!(err.to_string(), "Missing environment token setting: GH_TOKEN");
    }

    #[test]
    fn blank_tokens_count_as_missing() {
        let vars = lookup(&[("SLACK_BOT_TOKEN", "  "), ("GH_TOKEN", "ghp")]);
        let err = Config::from_lookup(vars).unwrap_err();

        assert!(matches!(err, ConfigError::Missing(EnvVar::SlackBotToken)));
    }

    #[test]
    fn repositories_are_split() {
        let config = Config::from_lookup(lookup(&[
            ("SLACK_BOT_TOKEN", "xoxb"),
            ("GH_TOKEN", "ghp"),
            ("RELNOTIFY_REPOS", "tower, awx:devel,"),
            ("RELNOTIFY_BIND", "127.0.0.1:3000"),
        ]))
        .unwrap();

        assert_eq!(config.repositories, vec!["tower", "awx:devel"]);
        assert_eq!(config.bind.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn invalid_bind_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("SLACK_BOT_TOKEN", "xoxb"),
            ("GH_TOKEN", "ghp"),
            ("RELNOTIFY_BIND", "not an address"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { var: EnvVar::Bind, .. }));
    }
}
