//! Topic catalog types.

use serde::{Deserialize, Serialize};

/// A conversation topic with its candidate opening questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    #[serde(default)]
    pub questions: Vec<String>,
}

impl Topic {
    pub fn new<I, S>(title: impl Into<String>, questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            questions: questions.into_iter().map(Into::into).collect(),
        }
    }
}

/// The fixed set of topics the seeder draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicCatalog {
    topics: Vec<Topic>,
}

impl TopicCatalog {
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }
}

impl Default for TopicCatalog {
    fn default() -> Self {
        super::preset::default_catalog()
    }
}

/// Opening message produced for a fresh session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Starter {
    /// Greeting shown as the first assistant turn.
    pub opening_text: String,
    /// Title of the chosen topic.
    pub topic: String,
}
