//! Opening topics.
//!
//! - `model`: catalog types (`Topic`, `TopicCatalog`, `Starter`)
//! - `preset`: the built-in catalog
//! - `seeder`: random starter selection

mod model;
mod preset;
mod seeder;

pub use model::{Starter, Topic, TopicCatalog};
pub use preset::default_catalog;
pub use seeder::{GENERIC_QUESTION, seed};
