//! Signal-derived per-utterance features.

use std::sync::Arc;

use callqa_audio::{Interval, PitchEstimator, Waveform};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lexicon::{tokenize, Lexicon};
use crate::utterance::Utterance;

/// Acoustic measurements of one utterance.
///
/// All fields are 0.0 for corrupted utterances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AcousticFeatures {
    /// Content syllables per minute.
    pub speed_spm: f64,
    /// RMS level in dBFS, -100 for silence.
    pub volume_db: f64,
    /// Mean voiced f0 in Hz, 0 when undetermined.
    pub pitch_hz: f64,
    pub pitch_stddev: f64,
    /// Fraction of the utterance span outside non-silent intervals.
    pub silence_ratio: f64,
}

/// Computes [`AcousticFeatures`] from the shared waveform.
///
/// The analyzer holds only immutable state and is shared across worker
/// threads.
#[derive(Clone)]
pub struct AcousticAnalyzer {
    lexicon: Arc<Lexicon>,
    pitch: Arc<dyn PitchEstimator>,
    min_speech_duration: f64,
}

impl AcousticAnalyzer {
    pub fn new(
        lexicon: Arc<Lexicon>,
        pitch: Arc<dyn PitchEstimator>,
        min_speech_duration: f64,
    ) -> Self {
        Self {
            lexicon,
            pitch,
            min_speech_duration,
        }
    }

    pub fn analyze(
        &self,
        utterance: &Utterance,
        wave: &Waveform,
        intervals: &[Interval],
    ) -> AcousticFeatures {
        if utterance.is_corrupted {
            return AcousticFeatures::default();
        }

        let slice = wave.slice_secs(utterance.start_time, utterance.end_time);
        let track = self.pitch.estimate(slice, wave.sample_rate);
        let pitch_hz = match track.mean() {
            Some(mean) => mean,
            None => {
                debug!(
                    start = utterance.start_time,
                    end = utterance.end_time,
                    frames = track.frames.len(),
                    "no voiced frames, pitch set to 0"
                );
                0.0
            }
        };

        AcousticFeatures {
            speed_spm: self.speed_spm(&utterance.text, utterance.duration),
            volume_db: callqa_audio::level_db(slice),
            pitch_hz,
            pitch_stddev: track.stddev().unwrap_or(0.0),
            silence_ratio: silence_ratio(
                utterance.start_time,
                utterance.end_time,
                intervals,
                wave.sample_rate,
            ),
        }
    }

    /// Content tokens per minute. Tokens of one character and fillers do
    /// not count.
    pub fn speed_spm(&self, text: &str, duration: f64) -> f64 {
        if duration <= self.min_speech_duration {
            return 0.0;
        }
        let content = tokenize(text)
            .iter()
            .filter(|t| t.chars().count() > 1 && !self.lexicon.is_filler(t))
            .count();
        if content == 0 {
            return 0.0;
        }
        content as f64 / duration * 60.0
    }
}

/// Share of `[start, end)` not covered by `intervals`, in `[0, 1]`.
///
/// `intervals` must be sorted and non-overlapping, as produced by
/// [`callqa_audio::silence::split`].
pub fn silence_ratio(start: f64, end: f64, intervals: &[Interval], sample_rate: u32) -> f64 {
    let duration = end - start;
    if duration <= 0.0 || sample_rate == 0 {
        return 0.0;
    }

    let sr = sample_rate as f64;
    let first = intervals.partition_point(|iv| (iv.end as f64 / sr) <= start);
    let mut speech = 0.0;
    for iv in &intervals[first..] {
        let (s, e) = iv.to_secs(sample_rate);
        if s >= end {
            break;
        }
        speech += (e.min(end) - s.max(start)).max(0.0);
    }
    let speech = speech.min(duration);
    ((duration - speech) / duration).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use crate::transcript::RawUtterance;
    use crate::utterance::CorruptionRule;
    use callqa_audio::Yin;

    fn analyzer() -> AcousticAnalyzer {
        AcousticAnalyzer::new(Arc::new(Lexicon::default()), Arc::new(Yin::default()), 0.2)
    }

    fn sine(freq: f64, secs: f64, sr: u32) -> Vec<f32> {
        let n = (secs * sr as f64) as usize;
        (0..n)
            .map(|i| (0.5 * (2.0 * std::f64::consts::PI * freq * i as f64 / sr as f64).sin()) as f32)
            .collect()
    }

    fn utterance(start: f64, end: f64, text: &str) -> Utterance {
        Utterance::new(
            &RawUtterance::new("0", start, end, text),
            Role::Sales,
            &CorruptionRule::default(),
        )
    }

    #[test]
    fn speed_ignores_case_and_punctuation() {
        let a = analyzer();
        assert_eq!(a.speed_spm("Xin Chào!", 2.0), a.speed_spm("xin chao", 2.0));
        assert_eq!(a.speed_spm("xin chao", 2.0), 60.0);
    }

    #[test]
    fn speed_zero_for_fillers_only() {
        assert_eq!(analyzer().speed_spm("à ừ dạ", 2.0), 0.0);
    }

    #[test]
    fn speed_zero_for_short_duration() {
        let a = analyzer();
        assert_eq!(a.speed_spm("sản phẩm tốt", 0.2), 0.0);
        assert!(a.speed_spm("sản phẩm tốt", 0.21) > 0.0);
    }

    #[test]
    fn speed_drops_single_char_tokens() {
        // "a" and "b" are too short, "dạ" is a filler.
        assert_eq!(analyzer().speed_spm("a b dạ sản phẩm", 6.0), 20.0);
    }

    #[test]
    fn corrupted_utterance_is_all_zero() {
        let wave = Waveform::new(sine(220.0, 1.0, 16000), 16000);
        let u = utterance(0.0, 0.1, "một hai ba bốn năm sáu bảy tám chín mười");
        assert!(u.is_corrupted);
        let got = analyzer().analyze(&u, &wave, &[Interval { start: 0, end: 16000 }]);
        assert_eq!(got, AcousticFeatures::default());
    }

    #[test]
    fn tone_features() {
        let wave = Waveform::new(sine(220.0, 2.0, 16000), 16000);
        let intervals = callqa_audio::silence::split(&wave.samples, &Default::default());
        let got = analyzer().analyze(&utterance(0.5, 1.5, "sản phẩm"), &wave, &intervals);
        assert!((got.pitch_hz - 220.0).abs() < 3.0, "pitch {}", got.pitch_hz);
        assert!(got.pitch_stddev < 5.0);
        // 0.5 amplitude sine: rms = 0.3536, about -9 dB
        assert!((got.volume_db + 9.03).abs() < 0.1, "volume {}", got.volume_db);
        assert_eq!(got.silence_ratio, 0.0);
        assert_eq!(got.speed_spm, 120.0);
    }

    #[test]
    fn silent_slice_reports_floor() {
        let wave = Waveform::new(vec![0.0; 16000], 16000);
        let got = analyzer().analyze(&utterance(0.0, 1.0, "xin chào"), &wave, &[]);
        assert_eq!(got.volume_db, -100.0);
        assert_eq!(got.pitch_hz, 0.0);
        assert_eq!(got.pitch_stddev, 0.0);
        assert_eq!(got.silence_ratio, 1.0);
    }

    #[test]
    fn utterance_past_audio_end() {
        let wave = Waveform::new(sine(220.0, 1.0, 16000), 16000);
        let got = analyzer().analyze(&utterance(5.0, 6.0, "xin chào"), &wave, &[]);
        assert_eq!(got.volume_db, -100.0);
        assert_eq!(got.pitch_hz, 0.0);
    }

    #[test]
    fn silence_ratio_partial_overlap() {
        let sr = 1000;
        let intervals = [
            Interval { start: 0, end: 500 },
            Interval { start: 1500, end: 2500 },
        ];
        // [0.25, 2.25): speech 0.25 + 0.75 = 1.0 of 2.0
        assert!((silence_ratio(0.25, 2.25, &intervals, sr) - 0.5).abs() < 1e-9);
        assert_eq!(silence_ratio(0.6, 1.4, &intervals, sr), 1.0);
        assert_eq!(silence_ratio(1.6, 2.4, &intervals, sr), 0.0);
    }

    #[test]
    fn silence_ratio_degenerate_span() {
        let intervals = [Interval { start: 0, end: 100 }];
        assert_eq!(silence_ratio(1.0, 1.0, &intervals, 100), 0.0);
        assert_eq!(silence_ratio(2.0, 1.0, &intervals, 100), 0.0);
        assert_eq!(silence_ratio(0.0, 1.0, &intervals, 0), 0.0);
    }
}
