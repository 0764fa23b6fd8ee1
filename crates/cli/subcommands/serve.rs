use std::{net::SocketAddr, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::post, Form, Router};
use config::Config;
use release_status::{acknowledgement, TrackedRepo};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    context::{tracked_repositories, RunContext},
    errors::RunError,
    worker,
};

/// The fields of a Slack slash-command payload we use; the rest is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommand {
    pub channel_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: String,
}

impl SlashCommand {
    /// Slack only renders `<@...>` mentions for user ids, so prefer those.
    fn mention(&self) -> &str {
        self.user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.user_name)
    }
}

#[derive(Debug, Clone)]
struct AppState {
    config: Arc<Config>,
    repositories: Arc<Vec<TrackedRepo>>,
}

/// Acknowledges in the channel, hands the run to a fresh task, and answers
/// Slack with an empty `200` either way.
async fn get_all(State(state): State<AppState>, Form(command): Form<SlashCommand>) -> StatusCode {
    info!(channel = %command.channel_id, user = %command.user_name, "release status requested");

    let ctx = match RunContext::new(&state.config, state.repositories.to_vec()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error: {e}");
            return StatusCode::OK;
        }
    };

    let text = acknowledgement(command.mention());

    match ctx.slack.send_message(&command.channel_id, &text, None).await {
        Ok(ts) => {
            tokio::spawn(worker::process_request(ctx, command.channel_id, ts));
        }
        Err(e) => error!("Error: {e}"),
    }

    StatusCode::OK
}

pub fn router(config: Config, repositories: Vec<TrackedRepo>) -> Router {
    let state = AppState {
        config: Arc::new(config),
        repositories: Arc::new(repositories),
    };

    Router::new()
        .route("/get-all", post(get_all))
        .with_state(state)
}

pub async fn serve(config: Config, bind: Option<SocketAddr>) -> Result<(), RunError> {
    let repositories = tracked_repositories(&config.repositories)?;
    let addr = bind.unwrap_or(config.bind);

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(config, repositories)).await?;

    Ok(())
}
