//! Interaction mode of a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChatError;

/// Persona the assistant adopts for a session.
///
/// The serialized form is the label the completion backend expects
/// (`"amigo"` / `"profesor"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConversationMode {
    /// Empathetic friend: emotional support and light conversation.
    #[default]
    #[serde(rename = "amigo")]
    Supportive,
    /// Didactic teacher: short structured explanations.
    #[serde(rename = "profesor")]
    Instructive,
}

impl ConversationMode {
    /// Label sent in the `mode` field of a completion request.
    pub fn wire_label(&self) -> &'static str {
        match self {
            Self::Supportive => "amigo",
            Self::Instructive => "profesor",
        }
    }

    /// Human-readable name shown by front ends.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Supportive => "Modo amigo",
            Self::Instructive => "Modo profesor",
        }
    }

    /// Input placeholder hint for the mode.
    pub fn input_hint(&self) -> &'static str {
        match self {
            Self::Supportive => "Cuéntame qué pasa o qué quieres charlar...",
            Self::Instructive => "Pregunta o tema para aprender...",
        }
    }
}

impl fmt::Display for ConversationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_label())
    }
}

impl FromStr for ConversationMode {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amigo" | "supportive" => Ok(Self::Supportive),
            "profesor" | "instructive" => Ok(Self::Instructive),
            other => Err(ChatError::config(format!(
                "Unknown conversation mode '{other}' (expected amigo or profesor)"
            ))),
        }
    }
}
