//! Splits assistant replies into display lines.

use regex::Regex;
use std::sync::LazyLock;

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+[.)]\s+)").expect("valid numbered-item pattern"));
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([•-]\s+)").expect("valid bullet pattern"));
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([.!?])\s+([A-ZÁÉÍÓÚÑ])").expect("valid sentence-break pattern")
});

/// Breaks `text` before numbered items and bullets, and after a sentence
/// terminator followed by an upper-case letter. Lines are trimmed and empty
/// ones dropped.
pub fn format_message(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let text = NUMBERED_ITEM.replace_all(text, "\n${1}");
    let text = BULLET.replace_all(&text, "\n${1}");
    let text = SENTENCE_BREAK.replace_all(&text, "${1}\n${2}");

    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
