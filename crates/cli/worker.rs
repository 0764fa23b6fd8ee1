use release_status::{format_releases, ReleaseAggregator, Releases};
use tracing::{debug, error, info, instrument};

use crate::{context::RunContext, errors::RunError};

pub async fn collect(ctx: &RunContext) -> Result<Releases, RunError> {
    let releases = ReleaseAggregator::new(&ctx.github)
        .run(&ctx.repositories)
        .await?;

    Ok(releases)
}

/// Background half of a slash command: aggregate, then reply in the thread
/// of the acknowledgement. Failures are logged and nothing is posted.
#[instrument(skip(ctx))]
pub async fn process_request(ctx: RunContext, channel: String, thread_ts: String) {
    let releases = match collect(&ctx).await {
        Ok(releases) => releases,
        Err(e) => {
            error!(exit_code = e.exit_code(), "release run aborted: {e}");
            return;
        }
    };

    let message = format_releases(&releases);
    debug!("{message}");

    match ctx.slack.send_message(&channel, &message, Some(&thread_ts)).await {
        Ok(ts) => info!(%ts, releases = releases.len(), "release summary posted"),
        Err(e) => error!("Error: {e}"),
    }
}
