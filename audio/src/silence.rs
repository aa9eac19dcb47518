//! Energy-based splitting of a PCM buffer into non-silent intervals.
//!
//! Frames are centered on `f * hop_length` and zero padded at the edges. A
//! frame is active when its mean-square energy is within `top_db` of the
//! loudest frame in the buffer. Runs of active frames become intervals
//! `[f0 * hop, f1 * hop)` clamped to the buffer length.

/// Energy below which the whole buffer counts as silent.
const ENERGY_FLOOR: f64 = 1e-10;

/// A half-open range of sample indices `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

impl Interval {
    /// Returns the number of samples covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true when the interval covers no samples.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns the interval bounds in seconds.
    pub fn to_secs(&self, sample_rate: u32) -> (f64, f64) {
        let sr = sample_rate as f64;
        (self.start as f64 / sr, self.end as f64 / sr)
    }
}

/// Configuration for [`split`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Threshold below the peak frame energy, in dB (default: 30).
    pub top_db: f64,
    /// Analysis frame length in samples (default: 2048).
    pub frame_length: usize,
    /// Hop between frames in samples (default: 512).
    pub hop_length: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            top_db: 30.0,
            frame_length: 2048,
            hop_length: 512,
        }
    }
}

/// Splits `samples` into sorted, non-overlapping non-silent intervals.
pub fn split(samples: &[f32], cfg: &SplitConfig) -> Vec<Interval> {
    if samples.is_empty() || cfg.frame_length == 0 || cfg.hop_length == 0 {
        return Vec::new();
    }

    let energy = frame_energy(samples, cfg.frame_length, cfg.hop_length);
    let peak = energy.iter().copied().fold(0.0f64, f64::max);
    if peak <= ENERGY_FLOOR {
        return Vec::new();
    }

    // 10*log10(e) >= 10*log10(peak) - top_db
    let threshold = peak * 10f64.powf(-cfg.top_db / 10.0);

    let n = samples.len();
    let to_sample = |frame: usize| (frame * cfg.hop_length).min(n);

    let mut intervals = Vec::new();
    let mut run_start: Option<usize> = None;
    for (f, &e) in energy.iter().enumerate() {
        let active = e > ENERGY_FLOOR && e >= threshold;
        match (active, run_start) {
            (true, None) => run_start = Some(f),
            (false, Some(s)) => {
                push_interval(&mut intervals, to_sample(s), to_sample(f));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = run_start {
        push_interval(&mut intervals, to_sample(s), n);
    }

    intervals
}

fn push_interval(intervals: &mut Vec<Interval>, start: usize, end: usize) {
    if end > start {
        intervals.push(Interval { start, end });
    }
}

/// Mean-square energy of centered frames; frame `f` spans
/// `[f*hop - frame/2, f*hop + frame/2)` with zeros outside the buffer.
fn frame_energy(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f64> {
    let n = samples.len();
    let half = frame_length / 2;
    let num_frames = 1 + n / hop_length;

    // Prefix sums of squares make each frame O(1).
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0f64);
    let mut acc = 0.0f64;
    for &s in samples {
        acc += (s as f64) * (s as f64);
        prefix.push(acc);
    }

    (0..num_frames)
        .map(|f| {
            let center = f * hop_length;
            let lo = center.saturating_sub(half).min(n);
            let hi = (center + frame_length - half).min(n);
            (prefix[hi] - prefix[lo]) / frame_length as f64
        })
        .collect()
}
