//! Call summary handed to the scorer.
//!
//! The summary condenses segment records into per-role averages, checks the
//! agent's opening and closing lines against the lexicon markers, and tallies
//! issues raised on the agent's segments.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::lexicon::{contains_any, Lexicon};
use crate::record::SegmentRecord;
use crate::role::Role;
use crate::standards::{self, categorize, Issue};

/// Characters kept in greeting and closing previews.
pub const PREVIEW_CHARS: usize = 200;

/// Sales segments inspected at each end of the call.
const EDGE_SEGMENTS: usize = 2;

/// Averages and totals over one role's segments.
///
/// Acoustic averages skip corrupted segments; pitch averages also skip
/// segments without a determined pitch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerStats {
    pub segment_count: usize,
    pub avg_speed_spm: f64,
    pub avg_volume_db: f64,
    pub avg_pitch_hz: f64,
    pub avg_pitch_stddev: f64,
    pub avg_silence_ratio: f64,
    pub speed_category: &'static str,
    pub volume_category: &'static str,
    pub pitch_category: &'static str,
    pub silence_category: &'static str,
    pub total_disfluencies: usize,
    pub total_politeness: usize,
    pub interruptions: usize,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

impl SpeakerStats {
    /// Returns `None` when the role has no segments.
    pub fn collect(records: &[SegmentRecord], role: Role) -> Option<Self> {
        let segments: Vec<&SegmentRecord> =
            records.iter().filter(|r| r.speaker == role).collect();
        if segments.is_empty() {
            return None;
        }
        let measured = || segments.iter().filter(|r| !r.is_corrupted);
        let voiced = || measured().filter(|r| r.acoustic.pitch_hz > 0.0);

        let speed = mean(measured().map(|r| r.acoustic.speed_spm));
        let volume = mean(measured().map(|r| r.acoustic.volume_db));
        let pitch = mean(voiced().map(|r| r.acoustic.pitch_hz));
        let pitch_stddev = mean(voiced().map(|r| r.acoustic.pitch_stddev));
        let silence = mean(measured().map(|r| r.acoustic.silence_ratio));

        let category = |v: Option<f64>, bands: &[standards::Band]| {
            v.map_or(standards::UNKNOWN, |v| categorize(v, bands))
        };

        Some(Self {
            segment_count: segments.len(),
            avg_speed_spm: round_to(speed.unwrap_or(0.0), 1),
            avg_volume_db: round_to(volume.unwrap_or(0.0), 1),
            avg_pitch_hz: round_to(pitch.unwrap_or(0.0), 1),
            avg_pitch_stddev: round_to(pitch_stddev.unwrap_or(0.0), 1),
            avg_silence_ratio: round_to(silence.unwrap_or(0.0), 2),
            speed_category: category(speed, standards::SPEED),
            volume_category: category(volume, standards::VOLUME),
            pitch_category: category(pitch, standards::PITCH),
            silence_category: category(silence, standards::SILENCE),
            total_disfluencies: segments.iter().map(|r| r.lexical.counts.disfluency_count).sum(),
            total_politeness: segments.iter().map(|r| r.lexical.counts.politeness_count).sum(),
            interruptions: segments.iter().filter(|r| r.lexical.is_interrupted).count(),
        })
    }
}

/// Checks on the agent's opening lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GreetingAnalysis {
    pub has_greeting: bool,
    pub has_name: bool,
    pub has_company: bool,
    pub full_greeting: bool,
    pub text_preview: String,
}

impl GreetingAnalysis {
    pub fn analyze(sales: &[&SegmentRecord], lexicon: &Lexicon) -> Self {
        let head = sales.iter().take(EDGE_SEGMENTS);
        let text = join_text(head).to_lowercase();
        let has_greeting = contains_any(&text, &lexicon.greeting_markers);
        let has_name = contains_any(&text, &lexicon.name_markers);
        let has_company = contains_any(&text, &lexicon.company_markers);
        Self {
            has_greeting,
            has_name,
            has_company,
            full_greeting: has_greeting && has_name && has_company,
            text_preview: text.chars().take(PREVIEW_CHARS).collect(),
        }
    }
}

/// Checks on the agent's closing lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClosingAnalysis {
    pub has_thanks: bool,
    pub has_goodbye: bool,
    pub proper_closing: bool,
    pub text_preview: String,
}

impl ClosingAnalysis {
    pub fn analyze(sales: &[&SegmentRecord], lexicon: &Lexicon) -> Self {
        let tail = &sales[sales.len().saturating_sub(EDGE_SEGMENTS)..];
        let text = join_text(tail.iter()).to_lowercase();
        let has_thanks = contains_any(&text, &lexicon.thanks_markers);
        let has_goodbye = contains_any(&text, &lexicon.goodbye_markers);
        let skip = text.chars().count().saturating_sub(PREVIEW_CHARS);
        Self {
            has_thanks,
            has_goodbye,
            proper_closing: has_thanks || has_goodbye,
            text_preview: text.chars().skip(skip).collect(),
        }
    }
}

fn join_text<'a>(records: impl Iterator<Item = &'a &'a SegmentRecord>) -> String {
    records
        .map(|r| r.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Issue tally over the agent's segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssuesSummary {
    pub segments_with_issues: usize,
    pub issue_breakdown: BTreeMap<Issue, usize>,
    pub has_critical_issues: bool,
}

impl IssuesSummary {
    pub fn tally(sales: &[&SegmentRecord]) -> Self {
        let mut summary = Self::default();
        for record in sales.iter().filter(|r| !r.issues.is_empty()) {
            summary.segments_with_issues += 1;
            for &issue in &record.issues {
                *summary.issue_breakdown.entry(issue).or_default() += 1;
            }
        }
        summary.has_critical_issues = summary.issue_breakdown.keys().any(|i| i.is_critical());
        summary
    }
}

/// Call-level digest of the segment records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales: Option<SpeakerStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<SpeakerStats>,
    pub greeting: GreetingAnalysis,
    pub closing: ClosingAnalysis,
    pub issues: IssuesSummary,
}

impl CallSummary {
    pub fn build(records: &[SegmentRecord], lexicon: &Lexicon) -> Self {
        let sales: Vec<&SegmentRecord> = records
            .iter()
            .filter(|r| r.speaker == Role::Sales)
            .collect();
        Self {
            sales: SpeakerStats::collect(records, Role::Sales),
            customer: SpeakerStats::collect(records, Role::Customer),
            greeting: GreetingAnalysis::analyze(&sales, lexicon),
            closing: ClosingAnalysis::analyze(&sales, lexicon),
            issues: IssuesSummary::tally(&sales),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acoustic::AcousticFeatures;
    use crate::lexical::{LexicalCounts, LexicalFeatures};
    use crate::transcript::RawUtterance;
    use crate::utterance::{CorruptionRule, Utterance};

    fn record(role: Role, text: &str, acoustic: AcousticFeatures, politeness: usize) -> SegmentRecord {
        let u = Utterance::new(
            &RawUtterance::new("x", 0.0, 2.0, text),
            role,
            &CorruptionRule::default(),
        );
        let lexical = LexicalFeatures::new(
            LexicalCounts {
                politeness_count: politeness,
                ..Default::default()
            },
            false,
        );
        SegmentRecord::new(u, acoustic, lexical)
    }

    fn measured(speed: f64, pitch: f64) -> AcousticFeatures {
        AcousticFeatures {
            speed_spm: speed,
            volume_db: -25.0,
            pitch_hz: pitch,
            pitch_stddev: 30.0,
            silence_ratio: 0.3,
        }
    }

    #[test]
    fn stats_average_measured_segments() {
        let records = vec![
            record(Role::Sales, "a", measured(140.0, 200.0), 1),
            record(Role::Sales, "b", measured(160.0, 0.0), 2),
            record(Role::Customer, "c", measured(90.0, 120.0), 0),
        ];
        let stats = SpeakerStats::collect(&records, Role::Sales).unwrap();
        assert_eq!(stats.segment_count, 2);
        assert_eq!(stats.avg_speed_spm, 150.0);
        assert_eq!(stats.avg_pitch_hz, 200.0);
        assert_eq!(stats.speed_category, "normal");
        assert_eq!(stats.silence_category, "normal");
        assert_eq!(stats.total_politeness, 3);

        let customer = SpeakerStats::collect(&records, Role::Customer).unwrap();
        assert_eq!(customer.speed_category, "very_slow");
    }

    #[test]
    fn stats_absent_without_segments() {
        let records = vec![record(Role::Sales, "a", measured(140.0, 200.0), 1)];
        assert!(SpeakerStats::collect(&records, Role::Customer).is_none());
    }

    #[test]
    fn greeting_and_closing() {
        let records = vec![
            record(Role::Sales, "Dạ em chào anh, em là Lan", measured(150.0, 210.0), 1),
            record(Role::Customer, "Ừ chào em", measured(150.0, 120.0), 0),
            record(Role::Sales, "Em gọi từ công ty ABC", measured(150.0, 210.0), 0),
            record(Role::Sales, "Vâng ạ", measured(150.0, 210.0), 2),
            record(Role::Sales, "Em cảm ơn anh, chào anh ạ", measured(150.0, 210.0), 2),
        ];
        let summary = CallSummary::build(&records, &Lexicon::default());
        assert!(summary.greeting.full_greeting);
        assert_eq!(summary.greeting.text_preview, "dạ em chào anh, em là lan em gọi từ công ty abc");
        assert!(summary.closing.proper_closing);
        assert_eq!(summary.closing.text_preview, "vâng ạ em cảm ơn anh, chào anh ạ");
    }

    #[test]
    fn closing_with_thanks_only() {
        let records = vec![record(Role::Sales, "Em cảm ơn anh nhiều ạ", measured(150.0, 210.0), 1)];
        let closing = CallSummary::build(&records, &Lexicon::default()).closing;
        assert!(closing.has_thanks);
        assert!(!closing.has_goodbye);
        assert!(closing.proper_closing);

        let records = vec![record(Role::Sales, "Vâng ạ", measured(150.0, 210.0), 1)];
        let closing = CallSummary::build(&records, &Lexicon::default()).closing;
        assert!(!closing.proper_closing);
    }

    #[test]
    fn preview_is_truncated_by_chars() {
        let long = "ờ".repeat(300);
        let records = vec![record(Role::Sales, &long, measured(150.0, 210.0), 1)];
        let summary = CallSummary::build(&records, &Lexicon::default());
        assert_eq!(summary.greeting.text_preview.chars().count(), PREVIEW_CHARS);
        assert_eq!(summary.closing.text_preview.chars().count(), PREVIEW_CHARS);
        assert!(!summary.greeting.has_name);
    }

    #[test]
    fn issues_tally_sales_only() {
        let records = vec![
            record(Role::Sales, "a", measured(240.0, 210.0), 1),
            record(Role::Sales, "b", measured(150.0, 210.0), 0),
            record(Role::Sales, "c", measured(150.0, 210.0), 1),
            record(Role::Customer, "d", measured(240.0, 210.0), 0),
        ];
        let summary = CallSummary::build(&records, &Lexicon::default());
        assert_eq!(summary.issues.segments_with_issues, 2);
        assert_eq!(summary.issues.issue_breakdown[&Issue::SpeakingTooFast], 1);
        assert_eq!(summary.issues.issue_breakdown[&Issue::NoPoliteness], 1);
        assert!(summary.issues.has_critical_issues);

        let v = serde_json::to_value(&summary.issues).unwrap();
        assert_eq!(v["issue_breakdown"]["no_politeness"], 1);
    }
}
