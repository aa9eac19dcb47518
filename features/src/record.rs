//! Output row per utterance.

use serde::Serialize;

use crate::acoustic::AcousticFeatures;
use crate::lexical::LexicalFeatures;
use crate::role::Role;
use crate::standards::{flag_issues, Categories, Issue};
use crate::utterance::Utterance;

/// One analyzed utterance, serialized as a flat object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRecord {
    pub speaker: Role,
    pub speaker_id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    pub word_count: usize,
    pub is_corrupted: bool,
    #[serde(flatten)]
    pub acoustic: AcousticFeatures,
    #[serde(flatten)]
    pub lexical: LexicalFeatures,
    #[serde(flatten)]
    pub categories: Categories,
    pub issues: Vec<Issue>,
}

impl SegmentRecord {
    /// Assembles a record, deriving categories and issues from the features.
    pub fn new(utterance: Utterance, acoustic: AcousticFeatures, lexical: LexicalFeatures) -> Self {
        let categories = Categories::of(&acoustic, utterance.is_corrupted);
        let issues = flag_issues(&acoustic, &categories, &lexical.counts);
        Self {
            speaker: utterance.role,
            speaker_id: utterance.speaker_id,
            start_time: utterance.start_time,
            end_time: utterance.end_time,
            text: utterance.text,
            word_count: utterance.word_count,
            is_corrupted: utterance.is_corrupted,
            acoustic,
            lexical,
            categories,
            issues,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::LexicalCounts;
    use crate::transcript::RawUtterance;
    use crate::utterance::CorruptionRule;

    #[test]
    fn serializes_flat() {
        let u = Utterance::new(
            &RawUtterance::new("1", 0.0, 2.0, "dạ em chào anh"),
            Role::Sales,
            &CorruptionRule::default(),
        );
        let acoustic = AcousticFeatures {
            speed_spm: 150.0,
            volume_db: -25.0,
            pitch_hz: 210.0,
            pitch_stddev: 30.0,
            silence_ratio: 0.25,
        };
        let lexical = LexicalFeatures::new(
            LexicalCounts {
                politeness_count: 1,
                ..Default::default()
            },
            false,
        );
        let rec = SegmentRecord::new(u, acoustic, lexical);
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["speaker"], "Sales");
        assert_eq!(v["speaker_id"], "1");
        assert_eq!(v["word_count"], 4);
        assert_eq!(v["speed_spm"], 150.0);
        assert_eq!(v["politeness_count"], 1);
        assert_eq!(v["is_interrupted"], false);
        assert_eq!(v["speed_category"], "normal");
        assert_eq!(v["pitch_category"], "normal_female");
        assert_eq!(v["issues"], serde_json::json!([]));
        assert_eq!(rec.duration(), 2.0);
    }
}
