//! Splitting reasoning transcripts into classified thinking stages

use crate::classify::Category;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Synthetic duration per word (seconds). Roughly 100ms of "thinking" per
/// word keeps the timeline proportional to sentence length.
const SECONDS_PER_WORD: f64 = 0.1;

static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("invalid split regex"));

/// One classified sentence from a reasoning transcript.
///
/// Immutable after parsing; lives only for the request that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Stage {
    /// The trimmed sentence text
    pub content: String,
    /// Assigned category
    #[serde(rename = "type")]
    pub stage_type: Category,
    /// Synthetic duration in seconds (word count x 0.1)
    pub duration: f64,
    /// Zero-based position in the transcript
    pub index: usize,
}

/// Parse a raw thinking transcript into an ordered list of stages.
///
/// Sentences are split on runs of `.`, `!`, `?`. Empty or whitespace-only
/// fragments are dropped. A transcript with no terminating punctuation
/// yields a single stage; an empty transcript yields none.
pub fn parse_thinking(thinking_text: &str) -> Vec<Stage> {
    SENTENCE_SPLIT
        .split(thinking_text)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .enumerate()
        .map(|(index, fragment)| {
            let word_count = fragment.split_whitespace().count();
            Stage {
                content: fragment.to_string(),
                stage_type: Category::classify(&fragment.to_lowercase()),
                duration: word_count as f64 * SECONDS_PER_WORD,
                index,
            }
        })
        .collect()
}
