//! Mono f32 PCM buffer and level helpers.

/// Level reported for an empty slice or digital silence.
pub const SILENCE_DB: f64 = -100.0;

/// Decoded mono audio at its native sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Samples in `[-1, 1]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Waveform {
    /// Creates a waveform from samples and a sample rate.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Returns the duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Returns the samples between two timestamps (seconds).
    ///
    /// Indices are `floor(t * sample_rate)` and are clamped to the buffer, so
    /// out-of-range or inverted spans yield an empty slice.
    pub fn slice_secs(&self, start: f64, end: f64) -> &[f32] {
        let begin = sample_index(start, self.sample_rate, self.samples.len());
        let end = sample_index(end, self.sample_rate, self.samples.len());
        if begin >= end {
            return &[];
        }
        &self.samples[begin..end]
    }
}

/// Converts a timestamp to a sample index clamped to `[0, len]`.
pub fn sample_index(seconds: f64, sample_rate: u32, len: usize) -> usize {
    let idx = (seconds * sample_rate as f64).floor();
    if !(idx > 0.0) {
        return 0;
    }
    (idx as usize).min(len)
}

/// Root mean square of the samples, accumulated in f64.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / samples.len() as f64).sqrt()
}

/// RMS level in dBFS, floored at [`SILENCE_DB`].
pub fn level_db(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return SILENCE_DB;
    }
    let db = 20.0 * (rms(samples) + 1e-10).log10();
    db.max(SILENCE_DB)
}
