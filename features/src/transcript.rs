//! Diarized transcript input.

use serde::{Deserialize, Serialize};

/// One diarized segment as produced by the diarization service.
///
/// Missing fields follow the service's conventions: `start` defaults to 0,
/// `end` to `start`, `text` to empty and `speaker` to `"unknown"`. Speaker
/// ids may arrive as strings or numbers and are kept as opaque strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawUtteranceDoc")]
pub struct RawUtterance {
    pub speaker: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl RawUtterance {
    pub fn new(speaker: impl Into<String>, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            start,
            end,
            text: text.into(),
        }
    }

    /// Returns `max(0, end - start)`.
    pub fn span(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Reports whether both timestamps are finite numbers.
    pub fn has_finite_times(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}

#[derive(Deserialize)]
struct RawUtteranceDoc {
    #[serde(default)]
    speaker: Option<SpeakerId>,
    #[serde(default)]
    start: Option<f64>,
    #[serde(default)]
    end: Option<f64>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpeakerId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<RawUtteranceDoc> for RawUtterance {
    fn from(doc: RawUtteranceDoc) -> Self {
        let start = doc.start.unwrap_or(0.0);
        let speaker = match doc.speaker {
            Some(SpeakerId::Text(s)) => s,
            Some(SpeakerId::Int(n)) => n.to_string(),
            Some(SpeakerId::Float(f)) => f.to_string(),
            None => "unknown".to_string(),
        };
        Self {
            speaker,
            start,
            end: doc.end.unwrap_or(start),
            text: doc.text.unwrap_or_default(),
        }
    }
}

/// A transcript document: either a bare list of segments or the
/// diarization result object carrying them under `dialogue`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Transcript {
    Segments(Vec<RawUtterance>),
    Dialogue { dialogue: Vec<RawUtterance> },
}

impl Transcript {
    pub fn into_utterances(self) -> Vec<RawUtterance> {
        match self {
            Transcript::Segments(v) | Transcript::Dialogue { dialogue: v } => v,
        }
    }
}
