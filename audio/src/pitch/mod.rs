//! Fundamental frequency estimation.
//!
//! [`PitchEstimator`] turns a mono slice into a [`PitchTrack`] of per-frame
//! f0 estimates with a voiced flag. [`Yin`] is the bundled implementation;
//! callers that need a different tracker (for example a neural one) only have
//! to implement the trait.

mod yin;

pub use yin::{Yin, YinConfig};

/// One analysis frame of a pitch track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchFrame {
    /// Estimated fundamental frequency in Hz, 0.0 when unvoiced.
    pub f0: f64,
    /// True when a periodic fundamental was found in the frame.
    pub voiced: bool,
}

impl PitchFrame {
    pub const UNVOICED: PitchFrame = PitchFrame {
        f0: 0.0,
        voiced: false,
    };

    pub fn voiced(f0: f64) -> Self {
        Self { f0, voiced: true }
    }
}

/// Per-frame pitch estimates for one slice of audio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitchTrack {
    pub frames: Vec<PitchFrame>,
}

impl PitchTrack {
    pub fn new(frames: Vec<PitchFrame>) -> Self {
        Self { frames }
    }

    /// Returns the f0 values of voiced frames.
    pub fn voiced(&self) -> impl Iterator<Item = f64> + '_ {
        self.frames.iter().filter(|f| f.voiced).map(|f| f.f0)
    }

    /// Returns the number of voiced frames.
    pub fn voiced_count(&self) -> usize {
        self.frames.iter().filter(|f| f.voiced).count()
    }

    /// Mean f0 over voiced frames, or `None` without any.
    pub fn mean(&self) -> Option<f64> {
        let n = self.voiced_count();
        if n == 0 {
            return None;
        }
        Some(self.voiced().sum::<f64>() / n as f64)
    }

    /// Population standard deviation of voiced f0, or `None` with fewer
    /// than two voiced frames.
    pub fn stddev(&self) -> Option<f64> {
        let n = self.voiced_count();
        if n < 2 {
            return None;
        }
        let mean = self.mean()?;
        let var = self.voiced().map(|f| (f - mean) * (f - mean)).sum::<f64>() / n as f64;
        Some(var.sqrt())
    }
}

/// Estimates a pitch track from mono samples.
///
/// Implementations must be reentrant: one estimator is shared by every
/// worker thread of a pipeline.
pub trait PitchEstimator: Send + Sync {
    fn estimate(&self, samples: &[f32], sample_rate: u32) -> PitchTrack;
}
