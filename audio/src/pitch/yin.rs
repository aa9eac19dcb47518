use crate::fft::{cross_correlate, next_pow2};

use super::{PitchEstimator, PitchFrame, PitchTrack};

/// Configures the [`Yin`] estimator.
///
/// The default band is C2 (65.41 Hz) to C7 (2093 Hz), wide enough for any
/// speaking voice on a phone line.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct YinConfig {
    /// Lowest detectable f0 in Hz (default: 65.41).
    pub fmin: f64,
    /// Highest detectable f0 in Hz (default: 2093.0).
    pub fmax: f64,
    /// Absolute threshold on the cumulative mean normalized difference
    /// (default: 0.15).
    pub threshold: f64,
    /// Hop between frames in samples, 0 = a quarter frame (default: 0).
    pub hop_length: usize,
    /// Mean-square energy below which a frame is unvoiced (default: 1e-8).
    pub energy_floor: f64,
}

impl Default for YinConfig {
    fn default() -> Self {
        Self {
            fmin: 65.41,
            fmax: 2093.0,
            threshold: 0.15,
            hop_length: 0,
            energy_floor: 1e-8,
        }
    }
}

/// YIN fundamental frequency tracker (de Cheveigné & Kawahara, 2002).
///
/// The difference function is computed from an FFT cross-correlation plus
/// running energies, so each frame costs `O(W log W)` rather than `O(W^2)`.
/// The frame length `W` is the next power of two covering two periods of
/// `fmin` at the input sample rate.
#[derive(Debug, Clone, Default)]
pub struct Yin {
    cfg: YinConfig,
}

/// Lag bounds and framing derived from a config and a sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    min_lag: usize,
    max_lag: usize,
    frame_length: usize,
    hop_length: usize,
}

impl Yin {
    pub fn new(cfg: YinConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &YinConfig {
        &self.cfg
    }

    fn geometry(&self, sample_rate: u32) -> Option<Geometry> {
        let cfg = &self.cfg;
        if sample_rate == 0 || !(cfg.fmin > 0.0) || !(cfg.fmax > cfg.fmin) {
            return None;
        }
        let sr = sample_rate as f64;
        let min_lag = ((sr / cfg.fmax).floor() as usize).max(2);
        let max_lag = (sr / cfg.fmin).ceil() as usize;
        if max_lag <= min_lag {
            return None;
        }
        let frame_length = next_pow2(2 * max_lag);
        let hop_length = if cfg.hop_length > 0 {
            cfg.hop_length
        } else {
            frame_length / 4
        };
        Some(Geometry {
            min_lag,
            max_lag,
            frame_length,
            hop_length,
        })
    }

    fn analyze_frame(&self, frame: &[f64], geo: Geometry, sample_rate: u32) -> PitchFrame {
        let Geometry {
            min_lag, max_lag, ..
        } = geo;
        let window = frame.len() - max_lag;

        // Running energies: energy[t] = sum of x[j]^2 for j in t..t+window.
        let mut prefix = Vec::with_capacity(frame.len() + 1);
        prefix.push(0.0f64);
        let mut acc = 0.0;
        for &x in frame {
            acc += x * x;
            prefix.push(acc);
        }
        let energy = |t: usize| prefix[t + window] - prefix[t];

        let e0 = energy(0);
        if e0 / (window as f64) < self.cfg.energy_floor {
            return PitchFrame::UNVOICED;
        }

        let corr = cross_correlate(&frame[..window], frame, max_lag);

        // Cumulative mean normalized difference d'(tau).
        let mut cmnd = vec![1.0f64; max_lag + 1];
        let mut running = 0.0;
        for tau in 1..=max_lag {
            let d = (e0 + energy(tau) - 2.0 * corr[tau]).max(0.0);
            running += d;
            cmnd[tau] = if running > 0.0 {
                d * tau as f64 / running
            } else {
                1.0
            };
        }

        let Some(mut tau) = (min_lag..=max_lag).find(|&t| cmnd[t] < self.cfg.threshold) else {
            return PitchFrame::UNVOICED;
        };
        while tau < max_lag && cmnd[tau + 1] < cmnd[tau] {
            tau += 1;
        }

        let period = refine(&cmnd, tau);
        let f0 = sample_rate as f64 / period;
        if f0 < self.cfg.fmin || f0 > self.cfg.fmax {
            return PitchFrame::UNVOICED;
        }
        PitchFrame::voiced(f0)
    }
}

/// Parabolic interpolation of the minimum around `tau`.
fn refine(cmnd: &[f64], tau: usize) -> f64 {
    if tau < 1 || tau + 1 >= cmnd.len() {
        return tau as f64;
    }
    let (a, b, c) = (cmnd[tau - 1], cmnd[tau], cmnd[tau + 1]);
    let denom = a - 2.0 * b + c;
    if denom.abs() < 1e-12 {
        return tau as f64;
    }
    let shift = (0.5 * (a - c) / denom).clamp(-1.0, 1.0);
    tau as f64 + shift
}

impl PitchEstimator for Yin {
    fn estimate(&self, samples: &[f32], sample_rate: u32) -> PitchTrack {
        let Some(geo) = self.geometry(sample_rate) else {
            return PitchTrack::default();
        };
        if samples.len() < geo.frame_length {
            return PitchTrack::default();
        }

        let num_frames = (samples.len() - geo.frame_length) / geo.hop_length + 1;
        let mut frame = vec![0.0f64; geo.frame_length];
        let mut frames = Vec::with_capacity(num_frames);

        for f in 0..num_frames {
            let offset = f * geo.hop_length;
            for (dst, &src) in frame
                .iter_mut()
                .zip(&samples[offset..offset + geo.frame_length])
            {
                *dst = src as f64;
            }
            frames.push(self.analyze_frame(&frame, geo, sample_rate));
        }

        PitchTrack::new(frames)
    }
}
