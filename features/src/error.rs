use callqa_audio::DecodeError;

/// Errors that abort a whole extraction.
///
/// Per-utterance anomalies (corrupted segments, unvoiced audio) are not
/// errors; they resolve to zeroed features inside the utterance.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("audio decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("transcript contains no utterances")]
    EmptyTranscript,

    #[error("utterance {index} has a non-finite timestamp (start {start}, end {end})")]
    InvalidTimestamp { index: usize, start: f64, end: f64 },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
