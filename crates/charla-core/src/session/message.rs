//! Transcript turn types.
//!
//! This module contains types for representing the turns of a chat
//! transcript, including roles and attachment metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Text typed by the user.
    User,
    /// Reply produced by the assistant (or the fallback/opening message).
    Assistant,
}

/// Stable handle to a turn inside one session's transcript.
///
/// Ids are assigned in append order and never reused within a session, so a
/// reveal task can target its turn without relying on the transcript shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(pub u64);

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

/// An attachment supplied by the attachment source.
///
/// `data_ref` is an opaque string-encoded blob (usually a data URL). The
/// engine forwards it but never inspects it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub name: String,
    pub data_ref: String,
}

impl AttachmentRef {
    pub fn new(name: impl Into<String>, data_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_ref: data_ref.into(),
        }
    }
}

// Blobs can be megabytes long; keep them out of logs.
impl fmt::Debug for AttachmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentRef")
            .field("name", &self.name)
            .field("data_ref_len", &self.data_ref.len())
            .finish()
    }
}

/// A single turn in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Handle of this turn within its session.
    pub id: TurnId,
    /// Who authored the turn.
    pub role: TurnRole,
    /// Turn text. For a turn being revealed this is the current prefix.
    pub text: String,
    /// Attachment sent along with a user turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentRef>,
    /// Timestamp when the turn was appended (ISO 8601 format).
    pub timestamp: String,
}
