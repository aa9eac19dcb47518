//! Audio front end for call analysis.
//!
//! This crate provides:
//!
//! - [`decode`]: WAV, MP3, M4A and raw PCM16 decoding into a mono [`Waveform`] at the native sample rate
//! - [`silence`]: energy-based splitting into non-silent sample intervals
//! - [`pitch`]: fundamental frequency tracking behind the [`PitchEstimator`] trait
//! - [`waveform`]: sample slicing by timestamp and RMS level in dBFS
//!
//! # Example
//!
//! ```rust
//! use callqa_audio::pitch::{PitchEstimator, Yin};
//! use callqa_audio::silence::{split, SplitConfig};
//! use callqa_audio::Waveform;
//!
//! // 1 second of a 220 Hz tone at 16 kHz
//! let samples: Vec<f32> = (0..16000)
//!     .map(|i| (0.5 * (2.0 * std::f64::consts::PI * 220.0 * i as f64 / 16000.0).sin()) as f32)
//!     .collect();
//! let wave = Waveform::new(samples, 16000);
//!
//! let intervals = split(&wave.samples, &SplitConfig::default());
//! assert_eq!(intervals.len(), 1);
//!
//! let track = Yin::default().estimate(wave.slice_secs(0.0, 1.0), wave.sample_rate);
//! assert!((track.mean().unwrap() - 220.0).abs() < 2.0);
//! ```

pub mod decode;
pub mod fft;
pub mod pitch;
pub mod silence;
pub mod waveform;

pub use decode::{decode, decode_pcm16, decode_wav, DecodeError};
pub use pitch::{PitchEstimator, PitchFrame, PitchTrack, Yin, YinConfig};
pub use silence::{Interval, SplitConfig};
pub use waveform::{level_db, rms, Waveform, SILENCE_DB};
