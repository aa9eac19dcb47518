//! Per-utterance acoustic and lexical features for recorded sales calls.
//!
//! The input is a diarized transcript ([`RawUtterance`] list) and the call
//! audio. [`Pipeline::extract`] resolves which speaker is the sales agent,
//! measures every utterance and aggregates the call:
//!
//! - [`role`]: speaker role inference behind the [`RoleClassifier`] trait
//! - [`utterance`]: typed turns and the corrupted-segment rule
//! - [`acoustic`]: speed, volume, pitch and silence ratio
//! - [`lexical`]: word-list counts driven by a [`Lexicon`]
//! - [`interruption`]: sales-over-customer interruption flags
//! - [`metadata`]: call duration, turns and sales talk ratio
//! - [`standards`]: rating bands and issue flags
//! - [`summary`]: per-role statistics and greeting/closing checks
//! - [`report`]: the status envelope for byte-level callers
//!
//! # Example
//!
//! ```rust
//! use callqa_audio::Waveform;
//! use callqa_features::{Pipeline, PipelineConfig, RawUtterance, Role};
//!
//! let transcript = vec![
//!     RawUtterance::new("0", 0.0, 5.0, "Dạ em chào anh"),
//!     RawUtterance::new("1", 5.2, 12.0, "Chào em, cho anh hỏi về sản phẩm A"),
//! ];
//! let wave = Waveform::new(vec![0.0; 16000 * 12], 16000);
//!
//! let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//! let out = pipeline.extract(&transcript, &wave).unwrap();
//! assert_eq!(out.segments[1].speaker, Role::Sales);
//! assert_eq!(out.metadata.turns, 1);
//! ```

pub mod acoustic;
pub mod error;
pub mod interruption;
pub mod lexical;
pub mod lexicon;
pub mod metadata;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod role;
pub mod standards;
pub mod summary;
pub mod transcript;
pub mod utterance;

pub use acoustic::{AcousticAnalyzer, AcousticFeatures};
pub use error::FeatureError;
pub use lexical::{LexicalAnalyzer, LexicalCounts, LexicalFeatures};
pub use lexicon::Lexicon;
pub use metadata::CallMetadata;
pub use pipeline::{Extraction, Pipeline, PipelineBuilder, PipelineConfig};
pub use record::SegmentRecord;
pub use report::ExtractionReport;
pub use role::{
    FirstSpeakerClassifier, Role, RoleClassifier, RoleMap, RoleStrategy, TalkTimeClassifier,
};
pub use standards::{Categories, Issue};
pub use summary::CallSummary;
pub use transcript::{RawUtterance, Transcript};
pub use utterance::{CorruptionRule, Utterance};
