//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: the session state store (`Session`, `PendingRequest`)
//! - `message`: transcript types (`Turn`, `TurnRole`, `TurnId`, `AttachmentRef`)
//! - `app_mode`: the persona selector (`ConversationMode`)

mod app_mode;
mod message;
mod model;

// Re-export public API
pub use app_mode::ConversationMode;
pub use message::{AttachmentRef, Turn, TurnId, TurnRole};
pub use model::{PendingRequest, Session};
