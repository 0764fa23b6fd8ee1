use color_eyre::{eyre::eyre, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

mod http;
pub mod models;

use crate::models::*;

/// Bot-token client for the Slack Web API.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl SlackClient {
    pub fn new(base_url: &str, token: SecretString) -> Result<Self> {
        Ok(Self {
            http: http::make_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Posts `message` and returns Slack's reply. A reply with `ok: false`
    /// is turned into an error carrying Slack's error code.
    pub async fn post_message(&self, message: &PostMessage) -> Result<PostMessageResponse> {
        let url = format!("{}/chat.postMessage", self.base_url);
        debug!(%url, "POST");

        let response = self
            .http
            .post(url)
            .bearer_auth(self.token.expose_secret())
            .json(message)
            .send()
            .await?
            .error_for_status()?
            .json::<PostMessageResponse>()
            .await?;

        if !response.ok {
            return Err(eyre!(
                "chat.postMessage failed: {}",
                response.error.as_deref().unwrap_or("unknown_error")
            ));
        }

        Ok(response)
    }

    /// Posts `text` to `channel`, as a threaded reply when `thread_ts` is set.
    /// Returns the timestamp of the new message.
    pub async fn send_message(
        &self,
        channel: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> Result<String> {
        let mut message = PostMessage::new(channel, text);

        if let Some(ts) = thread_ts {
            message = message.thread_ts(ts);
        }

        let response = self.post_message(&message).await?;

        response
            .ts
            .ok_or_else(|| eyre!("chat.postMessage response has no `ts`"))
    }
}
