use config::Config;
use tracing::info;

use crate::{
    context::{tracked_repositories, RunContext},
    errors::RunError,
    worker,
};

/// One-shot run; prints the records as pretty JSON. Falls back to the
/// configured repositories when none are given.
pub async fn report(config: &Config, repositories: Vec<String>) -> Result<(), RunError> {
    let names = if repositories.is_empty() {
        config.repositories.clone()
    } else {
        repositories
    };

    let ctx = RunContext::new(config, tracked_repositories(&names)?)?;
    let releases = worker::collect(&ctx).await?;

    info!(releases = releases.len(), "report ready");
    println!("{}", serde_json::to_string_pretty(&releases)?);

    Ok(())
}
