//! Summarization: sentences → summary bullets

use super::text::{title_case, truncate_chars};
use crate::model::{Sentence, SummaryBullet};

/// Maximum number of bullets per paper
pub const MAX_BULLETS: usize = 5;

/// Bullet text keeps this many chars of its sentence
pub const BULLET_TEXT_CHARS: usize = 200;

/// Weight assigned to every bullet
pub const BULLET_WEIGHT: f32 = 0.5;

/// One bullet per leading sentence, in stored order
pub fn summarize(sentences: &[Sentence]) -> Vec<SummaryBullet> {
    sentences
        .iter()
        .take(MAX_BULLETS)
        .map(|s| SummaryBullet {
            section: title_case(s.section.as_str()),
            text: truncate_chars(&s.text, BULLET_TEXT_CHARS).to_string(),
            weight: BULLET_WEIGHT,
        })
        .collect()
}
