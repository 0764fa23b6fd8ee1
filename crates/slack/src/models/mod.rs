use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// Body of `chat.postMessage`.
#[derive(Serialize, Setters, Debug, Clone, PartialEq, Eq)]
#[setters(strip_option, into)]
pub struct PostMessage {
    channel: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_ts: Option<String>,
}

impl PostMessage {
    pub fn new(channel: &str, text: &str) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
            thread_ts: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PostMessageResponse {
    pub ok: bool,
    pub channel: Option<String>,
    /// Timestamp of the posted message; replies use it as `thread_ts`.
    pub ts: Option<String>,
    pub error: Option<String>,
}
