//! Random conversation starters.

use rand::Rng;
use rand::seq::SliceRandom;

use super::model::{Starter, TopicCatalog};
use crate::error::{ChatError, Result};

/// Closing question used when a topic has no opening questions of its own.
pub const GENERIC_QUESTION: &str = "¿Quieres que arranquemos por ahí o prefieres otro tema?";

/// Picks a topic, then one of its questions, uniformly at random and
/// composes the greeting.
///
/// The RNG is injected so callers (and tests) control determinism.
pub fn seed<R: Rng + ?Sized>(catalog: &TopicCatalog, rng: &mut R) -> Result<Starter> {
    let topic = catalog
        .topics()
        .choose(rng)
        .ok_or_else(|| ChatError::config("Topic catalog is empty"))?;

    let question = topic
        .questions
        .choose(rng)
        .map(String::as_str)
        .unwrap_or(GENERIC_QUESTION);

    Ok(Starter {
        opening_text: format!(
            "¡Hola! Se me antoja que conversemos sobre {}. {}",
            topic.title, question
        ),
        topic: topic.title.clone(),
    })
}
