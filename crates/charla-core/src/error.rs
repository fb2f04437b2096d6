//! Error types for the Charla session engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every Charla crate.
///
/// Completion failures keep their distinguishing kind here even though the
/// user only ever sees a single fallback reply for all of them.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatError {
    /// A submission was attempted while another one is still in flight.
    #[error("Session is busy with another request")]
    Busy,

    /// The user text was empty after trimming.
    #[error("Input is empty")]
    EmptyInput,

    /// Transport-level failure talking to the completion service
    #[error("Network failure: {message}")]
    Network { message: String },

    /// The completion service answered with a non-success status
    #[error("Completion service failure (status {status}): {message}")]
    Service { status: u16, message: String },

    /// The completion service answered 2xx but the body was unusable
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a Service error
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Busy rejection
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true for the failures that surface to the user as the
    /// fallback assistant reply: network, service status and malformed body.
    pub fn is_completion_failure(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Service { .. } | Self::MalformedResponse(_)
        )
    }

    /// Short stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Busy => "busy",
            Self::EmptyInput => "empty_input",
            Self::Network { .. } => "network",
            Self::Service { .. } => "service",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

/// A type alias for `Result<T, ChatError>`.
pub type Result<T> = std::result::Result<T, ChatError>;
