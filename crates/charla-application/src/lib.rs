//! Application layer: the chat session engine and its reveal scheduler.

pub mod engine;
pub mod reveal;

pub use engine::{ChatEngine, SubmitOutcome};
pub use reveal::{RevealHandle, RevealOutcome, RevealScheduler, RevealStart, RevealTarget};
