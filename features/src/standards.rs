//! Rating bands and per-segment issue flags.
//!
//! Each acoustic measurement falls into a named half-open band
//! `[min, max)`. Values outside every band are `"unknown"`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::acoustic::AcousticFeatures;
use crate::lexical::LexicalCounts;

/// Category name for values outside every band and for corrupted segments.
pub const UNKNOWN: &str = "unknown";

/// A named half-open range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

const fn band(name: &'static str, min: f64, max: f64) -> Band {
    Band { name, min, max }
}

/// Speaking rate in syllables per minute.
pub const SPEED: &[Band] = &[
    band("very_slow", 0.0, 100.0),
    band("slow", 100.0, 120.0),
    band("normal", 120.0, 180.0),
    band("fast", 180.0, 220.0),
    band("very_fast", 220.0, 999.0),
];

/// Loudness in dBFS.
pub const VOLUME: &[Band] = &[
    band("too_quiet", -999.0, -50.0),
    band("quiet", -50.0, -35.0),
    band("normal", -35.0, -20.0),
    band("loud", -20.0, -10.0),
    band("too_loud", -10.0, 999.0),
];

/// Mean f0 in Hz.
pub const PITCH: &[Band] = &[
    band("very_low", 0.0, 120.0),
    band("low", 120.0, 160.0),
    band("normal_male", 160.0, 200.0),
    band("normal_female", 200.0, 280.0),
    band("high", 280.0, 350.0),
    band("very_high", 350.0, 999.0),
];

/// f0 standard deviation in Hz.
pub const PITCH_STDDEV: &[Band] = &[
    band("monotone", 0.0, 15.0),
    band("low_variation", 15.0, 25.0),
    band("normal", 25.0, 40.0),
    band("high_variation", 40.0, 60.0),
    band("excessive", 60.0, 999.0),
];

/// Silence ratio.
pub const SILENCE: &[Band] = &[
    band("continuous", 0.0, 0.1),
    band("low", 0.1, 0.2),
    band("normal", 0.2, 0.4),
    band("high", 0.4, 0.6),
    band("excessive", 0.6, 999.0),
];

/// Returns the name of the band containing `value`.
pub fn categorize(value: f64, bands: &[Band]) -> &'static str {
    bands
        .iter()
        .find(|b| value >= b.min && value < b.max)
        .map_or(UNKNOWN, |b| b.name)
}

/// Band names of a segment's acoustic features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Categories {
    pub speed_category: &'static str,
    pub volume_category: &'static str,
    pub pitch_category: &'static str,
    pub pitch_stddev_category: &'static str,
}

impl Categories {
    pub const UNKNOWN: Categories = Categories {
        speed_category: UNKNOWN,
        volume_category: UNKNOWN,
        pitch_category: UNKNOWN,
        pitch_stddev_category: UNKNOWN,
    };

    /// Categorizes measured features. Corrupted segments carry no
    /// measurements and are all [`UNKNOWN`].
    pub fn of(acoustic: &AcousticFeatures, is_corrupted: bool) -> Self {
        if is_corrupted {
            return Self::UNKNOWN;
        }
        Self {
            speed_category: categorize(acoustic.speed_spm, SPEED),
            volume_category: categorize(acoustic.volume_db, VOLUME),
            pitch_category: categorize(acoustic.pitch_hz, PITCH),
            pitch_stddev_category: categorize(acoustic.pitch_stddev, PITCH_STDDEV),
        }
    }
}

/// A delivery problem flagged on a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Issue {
    SpeakingTooFast,
    SpeakingTooSlow,
    TooQuiet,
    Monotone,
    FrequentDisfluency,
    NoPoliteness,
}

impl Issue {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SpeakingTooFast => "speaking_too_fast",
            Self::SpeakingTooSlow => "speaking_too_slow",
            Self::TooQuiet => "too_quiet",
            Self::Monotone => "monotone",
            Self::FrequentDisfluency => "frequent_disfluency",
            Self::NoPoliteness => "no_politeness",
        }
    }

    /// Issues that fail a call review on their own.
    pub fn is_critical(self) -> bool {
        matches!(self, Self::NoPoliteness | Self::TooQuiet | Self::Monotone)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disfluency count above which [`Issue::FrequentDisfluency`] is raised.
pub const MAX_DISFLUENCIES: usize = 3;

/// Flags issues in a fixed order.
///
/// Acoustic issues need measurements: none are raised for unknown
/// categories, and monotone needs a determined pitch.
pub fn flag_issues(
    acoustic: &AcousticFeatures,
    categories: &Categories,
    lexical: &LexicalCounts,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    match categories.speed_category {
        "fast" | "very_fast" => issues.push(Issue::SpeakingTooFast),
        "slow" | "very_slow" => issues.push(Issue::SpeakingTooSlow),
        _ => {}
    }
    if matches!(categories.volume_category, "quiet" | "too_quiet") {
        issues.push(Issue::TooQuiet);
    }
    if categories.pitch_stddev_category == "monotone" && acoustic.pitch_hz > 0.0 {
        issues.push(Issue::Monotone);
    }
    if lexical.disfluency_count > MAX_DISFLUENCIES {
        issues.push(Issue::FrequentDisfluency);
    }
    if lexical.politeness_count == 0 {
        issues.push(Issue::NoPoliteness);
    }
    issues
}
