//! Reveal cadence.
//!
//! Pure timing math and prefix stepping for the "typing" animation. The
//! timer task itself lives in `charla-application`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the reveal cadence, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTiming {
    /// Shortest total reveal, so tiny replies are still perceptible.
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,
    /// Longest total reveal before step flooring.
    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,
    /// Duration contributed by each character before clamping.
    #[serde(default = "default_per_char_ms")]
    pub per_char_ms: u64,
    /// Floor on the tick interval.
    #[serde(default = "default_min_step_ms")]
    pub min_step_ms: u64,
}

fn default_min_duration_ms() -> u64 {
    300
}

fn default_max_duration_ms() -> u64 {
    2000
}

fn default_per_char_ms() -> u64 {
    20
}

fn default_min_step_ms() -> u64 {
    15
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            min_duration_ms: default_min_duration_ms(),
            max_duration_ms: default_max_duration_ms(),
            per_char_ms: default_per_char_ms(),
            min_step_ms: default_min_step_ms(),
        }
    }
}

/// Computed cadence for one reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealPlan {
    /// Number of characters (and ticks) to reveal.
    pub chars: usize,
    /// Clamped target duration.
    pub duration: Duration,
    /// Interval between ticks.
    pub step: Duration,
}

impl RevealTiming {
    /// Plans the reveal of `text`, or `None` for empty text, which needs no
    /// timer at all.
    ///
    /// With the step floor applied the real elapsed time can exceed
    /// `max_duration_ms` for very long replies.
    pub fn plan(&self, text: &str) -> Option<RevealPlan> {
        let chars = text.chars().count();
        if chars == 0 {
            return None;
        }

        let raw = (chars as u64).saturating_mul(self.per_char_ms);
        let ceiling = self.max_duration_ms.max(self.min_duration_ms);
        let duration_ms = raw.clamp(self.min_duration_ms, ceiling);
        let step_ms = (duration_ms / chars as u64).max(self.min_step_ms).max(1);

        Some(RevealPlan {
            chars,
            duration: Duration::from_millis(duration_ms),
            step: Duration::from_millis(step_ms),
        })
    }
}

/// Iterator over the successively longer prefixes shown on each tick.
///
/// Yields exactly one prefix per character; the last one is the full text.
#[derive(Debug, Clone)]
pub struct Prefixes<'a> {
    text: &'a str,
    end: usize,
}

impl<'a> Prefixes<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, end: 0 }
    }
}

impl<'a> Iterator for Prefixes<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let ch = self.text[self.end..].chars().next()?;
        self.end += ch.len_utf8();
        Some(&self.text[..self.end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_plan() {
        assert_eq!(RevealTiming::default().plan(""), None);
    }

    #[test]
    fn test_short_reply_clamped_to_minimum() {
        let plan = RevealTiming::default().plan("hola").unwrap();
        assert_eq!(plan.chars, 4);
        assert_eq!(plan.duration, Duration::from_millis(300));
        assert_eq!(plan.step, Duration::from_millis(75));
    }

    #[test]
    fn test_mid_length_scales_linearly() {
        let text = "a".repeat(50);
        let plan = RevealTiming::default().plan(&text).unwrap();
        assert_eq!(plan.duration, Duration::from_millis(1000));
        assert_eq!(plan.step, Duration::from_millis(20));
    }

    #[test]
    fn test_long_reply_clamped_and_step_floored() {
        let text = "a".repeat(1000);
        let plan = RevealTiming::default().plan(&text).unwrap();
        assert_eq!(plan.duration, Duration::from_millis(2000));
        // 2000 / 1000 = 2ms, floored to 15ms
        assert_eq!(plan.step, Duration::from_millis(15));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let plan = RevealTiming::default().plan("¿sí?").unwrap();
        assert_eq!(plan.chars, 4);
    }

    #[test]
    fn test_prefixes_grow_by_one_character_and_end_at_full_text() {
        for text in ["x", "hola", "¿Qué tal? 🙂 ñ", "línea\nsegunda"] {
            let prefixes: Vec<&str> = Prefixes::new(text).collect();
            assert_eq!(prefixes.len(), text.chars().count());
            assert_eq!(*prefixes.last().unwrap(), text);

            let mut previous = "";
            for prefix in prefixes {
                assert!(prefix.starts_with(previous));
                assert_eq!(prefix[previous.len()..].chars().count(), 1);
                previous = prefix;
            }
        }
    }

    #[test]
    fn test_prefixes_of_empty_text() {
        assert_eq!(Prefixes::new("").count(), 0);
    }
}
