//! Engine configuration.
//!
//! Loaded once at startup (see `charla_interaction::config`) and handed to
//! the engine and client as an immutable `Arc<EngineConfig>`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ChatError, Result};
use crate::reveal::RevealTiming;
use crate::session::ConversationMode;
use crate::topic::TopicCatalog;

/// Completion endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/bedrock-chat/chat";

/// Assistant reply written when a completion fails for any reason.
pub const DEFAULT_FALLBACK_REPLY: &str =
    "No pude conectar con la API. Verifica tu backend de Bedrock y vuelve a intentar.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Completion service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub reveal: RevealTiming,
    #[serde(default)]
    pub catalog: TopicCatalog,
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
    /// Mode a freshly mounted session starts in
    #[serde(default)]
    pub default_mode: ConversationMode,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_fallback_reply() -> String {
    DEFAULT_FALLBACK_REPLY.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            reveal: RevealTiming::default(),
            catalog: TopicCatalog::default(),
            fallback_reply: default_fallback_reply(),
            default_mode: ConversationMode::default(),
        }
    }
}

impl EngineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Rejects configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ChatError::config("endpoint must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ChatError::config("request_timeout_secs must be positive"));
        }
        if self.catalog.is_empty() {
            return Err(ChatError::config("topic catalog must contain at least one topic"));
        }
        if self.reveal.min_duration_ms > self.reveal.max_duration_ms {
            return Err(ChatError::config(format!(
                "reveal.min_duration_ms ({}) exceeds reveal.max_duration_ms ({})",
                self.reveal.min_duration_ms, self.reveal.max_duration_ms
            )));
        }
        if self.reveal.min_step_ms == 0 {
            return Err(ChatError::config("reveal.min_step_ms must be positive"));
        }
        if self.fallback_reply.trim().is_empty() {
            return Err(ChatError::config("fallback_reply must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{ "endpoint": "https://chat.example/api", "reveal": { "max_duration_ms": 900 } }"#,
        )
        .unwrap();

        assert_eq!(config.endpoint, "https://chat.example/api");
        assert_eq!(config.reveal.max_duration_ms, 900);
        assert_eq!(config.reveal.min_duration_ms, 300);
        assert_eq!(config.catalog.len(), 15);
        assert_eq!(config.fallback_reply, DEFAULT_FALLBACK_REPLY);
    }

    #[test]
    fn test_validate_rejects_inverted_reveal_bounds() {
        let mut config = EngineConfig::default();
        config.reveal.min_duration_ms = 5000;
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_validate_rejects_zero_request_timeout() {
        let config = EngineConfig {
            request_timeout_secs: 0,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err, ChatError::config("request_timeout_secs must be positive"));
    }

    #[test]
    fn test_validate_rejects_empty_catalog() {
        let config = EngineConfig {
            catalog: TopicCatalog::new(Vec::new()),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
