//! Typed per-turn records built from raw diarized segments.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::role::{Role, RoleMap};
use crate::transcript::RawUtterance;

/// Thresholds for the "too many words in too little time" diarizer failure.
///
/// A segment shorter than `max_duration` seconds that still carries more
/// than `max_words` words is considered corrupted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptionRule {
    /// Seconds (default: 0.25).
    pub max_duration: f64,
    /// Whitespace-delimited words (default: 3).
    pub max_words: usize,
}

impl Default for CorruptionRule {
    fn default() -> Self {
        Self {
            max_duration: 0.25,
            max_words: 3,
        }
    }
}

impl CorruptionRule {
    pub fn is_corrupted(&self, duration: f64, word_count: usize) -> bool {
        duration < self.max_duration && word_count > self.max_words
    }
}

/// One speech turn with its resolved role.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub speaker_id: String,
    pub role: Role,
    pub start_time: f64,
    pub end_time: f64,
    /// `max(0, end_time - start_time)`.
    pub duration: f64,
    pub text: String,
    pub word_count: usize,
    pub is_corrupted: bool,
}

impl Utterance {
    pub fn new(raw: &RawUtterance, role: Role, rule: &CorruptionRule) -> Self {
        let duration = raw.span();
        let word_count = raw.text.split_whitespace().count();
        Self {
            speaker_id: raw.speaker.clone(),
            role,
            start_time: raw.start,
            end_time: raw.end,
            duration,
            text: raw.text.clone(),
            word_count,
            is_corrupted: rule.is_corrupted(duration, word_count),
        }
    }
}

/// Builds utterances in transcript order, logging every corrupted segment.
pub fn build_utterances(
    raw: &[RawUtterance],
    roles: &RoleMap,
    rule: &CorruptionRule,
) -> Vec<Utterance> {
    raw.iter()
        .enumerate()
        .map(|(index, r)| {
            let u = Utterance::new(r, roles.role_of(&r.speaker), rule);
            if u.is_corrupted {
                warn!(
                    index,
                    duration = u.duration,
                    words = u.word_count,
                    "corrupted segment: acoustic features zeroed"
                );
            }
            u
        })
        .collect()
}
