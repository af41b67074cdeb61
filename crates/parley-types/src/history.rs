//! Display-layer view of a session's history.
//!
//! `SimpleChatMessage` is built per request from prompts and messages and
//! never persisted. Field names serialize in camelCase for the web client.

use serde::{Deserialize, Serialize};

/// Options echoed back to the client so a turn can be re-submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOption {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

/// One rendered chat bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleChatMessage {
    pub uuid: String,
    pub date_time: String,
    pub text: String,
    /// Rendered as user-authored (right-aligned).
    pub inversion: bool,
    pub error: bool,
    pub loading: bool,
    #[serde(default)]
    pub is_prompt: bool,
    pub request_options: RequestOption,
}
