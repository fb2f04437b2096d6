//! Domain layer of the Charla chat assistant: session state, opening
//! topics, prompt composition, the completion contract and reveal timing.

pub mod completion;
pub mod config;
pub mod error;
pub mod prompt;
pub mod reveal;
pub mod session;
pub mod topic;

// Re-export common error type
pub use error::{ChatError, Result};
