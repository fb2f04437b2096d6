//! Completion service contract.
//!
//! Wire types for the remote text-completion endpoint and the
//! `CompletionClient` trait the engine calls through. Implementations live in
//! `charla-interaction`; tests substitute their own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ChatError, Result};
use crate::session::{AttachmentRef, ConversationMode};

/// JSON body posted to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub prompt: String,
    pub mode: ConversationMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

impl CompletionRequest {
    pub fn new(
        prompt: impl Into<String>,
        mode: ConversationMode,
        attachment: Option<&AttachmentRef>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            mode,
            image_name: attachment.map(|a| a.name.clone()),
            image_data: attachment.map(|a| a.data_ref.clone()),
        }
    }
}

/// Successful completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReply {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyBody {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extracts the reply text from a 2xx response body.
///
/// `response` is preferred, `message` is the fallback field. Bodies that are
/// not JSON objects, or where both fields are missing or empty, are
/// `MalformedResponse`.
pub fn parse_reply_body(body: &str) -> Result<CompletionReply> {
    let parsed: ReplyBody = serde_json::from_str(body)
        .map_err(|err| ChatError::malformed(format!("Invalid JSON body: {err}")))?;

    parsed
        .response
        .filter(|text| !text.is_empty())
        .or_else(|| parsed.message.filter(|text| !text.is_empty()))
        .map(|text| CompletionReply { text })
        .ok_or_else(|| ChatError::malformed("Body has neither 'response' nor 'message'"))
}

/// A remote text-completion service.
///
/// One call per user turn; implementations must not retry on their own and
/// must map every failure onto `Network`, `Service` or `MalformedResponse`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply>;
}
