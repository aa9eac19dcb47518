//! End-to-end feature extraction for one call.
//!
//! A [`Pipeline`] is built once from a [`PipelineConfig`] and reused for any
//! number of calls. It holds no per-call state, so one instance can serve
//! several threads.

use std::sync::Arc;

use callqa_audio::silence::{self, SplitConfig};
use callqa_audio::{PitchEstimator, Waveform, Yin, YinConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::acoustic::{AcousticAnalyzer, AcousticFeatures};
use crate::error::FeatureError;
use crate::interruption;
use crate::lexical::{LexicalAnalyzer, LexicalCounts, LexicalFeatures};
use crate::lexicon::Lexicon;
use crate::metadata::{self, CallMetadata};
use crate::record::SegmentRecord;
use crate::report::{self, ExtractionReport};
use crate::role::{RoleClassifier, RoleStrategy};
use crate::summary::CallSummary;
use crate::transcript::RawUtterance;
use crate::utterance::{build_utterances, CorruptionRule};

/// Thresholds and strategy switches for a [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub silence: SplitConfig,
    pub pitch: YinConfig,
    pub corruption: CorruptionRule,
    /// Utterances this short or shorter report a speed of 0 (default: 0.2).
    pub min_speech_duration: f64,
    /// Seconds (default: 0.3).
    pub interruption_gap: f64,
    pub role_strategy: RoleStrategy,
    /// Dedicated worker threads, 0 = rayon's global pool (default: 0).
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            silence: SplitConfig::default(),
            pitch: YinConfig::default(),
            corruption: CorruptionRule::default(),
            min_speech_duration: 0.2,
            interruption_gap: interruption::DEFAULT_GAP,
            role_strategy: RoleStrategy::default(),
            workers: 0,
        }
    }
}

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub segments: Vec<SegmentRecord>,
    pub metadata: CallMetadata,
    pub summary: CallSummary,
}

/// Orchestrates role resolution, per-utterance analysis and aggregation.
pub struct Pipeline {
    config: PipelineConfig,
    lexicon: Arc<Lexicon>,
    roles: Box<dyn RoleClassifier>,
    acoustic: AcousticAnalyzer,
    lexical: LexicalAnalyzer,
    pool: Option<rayon::ThreadPool>,
}

impl Pipeline {
    /// Creates a pipeline with the default lexicon and the configured role
    /// strategy and pitch settings.
    pub fn new(config: PipelineConfig) -> Result<Self, FeatureError> {
        Self::builder(config).build()
    }

    pub fn builder(config: PipelineConfig) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Extracts segment records, call metadata and the call summary.
    ///
    /// Fails on an empty transcript or a non-finite timestamp. Corrupted or
    /// silent utterances resolve to zeroed features inside their own record.
    pub fn extract(
        &self,
        raw: &[RawUtterance],
        wave: &Waveform,
    ) -> Result<Extraction, FeatureError> {
        self.guard(raw)?;

        let roles = self.roles.classify(raw)?;
        info!(
            utterances = raw.len(),
            speakers = roles.len(),
            sales = roles.sales_speaker(),
            classifier = self.roles.name(),
            "roles resolved"
        );

        let utterances = build_utterances(raw, &roles, &self.config.corruption);
        let intervals = silence::split(&wave.samples, &self.config.silence);
        debug!(
            intervals = intervals.len(),
            audio_secs = wave.duration_secs(),
            "non-silent intervals"
        );

        let analyze = || -> Vec<(AcousticFeatures, LexicalCounts)> {
            utterances
                .par_iter()
                .map(|u| {
                    (
                        self.acoustic.analyze(u, wave, &intervals),
                        self.lexical.count(&u.text),
                    )
                })
                .collect()
        };
        let features = match &self.pool {
            Some(pool) => pool.install(analyze),
            None => analyze(),
        };

        let interrupted = interruption::detect(&utterances, self.config.interruption_gap);
        let metadata = metadata::aggregate(&utterances);

        let segments: Vec<SegmentRecord> = utterances
            .into_iter()
            .zip(features)
            .zip(interrupted)
            .map(|((u, (acoustic, counts)), is_interrupted)| {
                SegmentRecord::new(u, acoustic, LexicalFeatures::new(counts, is_interrupted))
            })
            .collect();
        let summary = CallSummary::build(&segments, &self.lexicon);

        info!(
            segments = segments.len(),
            duration = metadata.duration,
            turns = metadata.turns,
            ratio_sales = metadata.ratio_sales,
            "features extracted"
        );
        Ok(Extraction {
            segments,
            metadata,
            summary,
        })
    }

    /// Decodes WAV, MP3 or M4A bytes and extracts, wrapping every outcome in
    /// a report.
    pub fn extract_bytes(&self, raw: &[RawUtterance], audio: &[u8]) -> ExtractionReport {
        let result = self
            .guard(raw)
            .and_then(|()| callqa_audio::decode(audio).map_err(FeatureError::from))
            .and_then(|wave| self.extract(raw, &wave));
        ExtractionReport::from_result(Some(report::task_id(audio)), result)
    }

    /// Like [`Pipeline::extract_bytes`] for headerless 16-bit mono PCM.
    pub fn extract_pcm16(
        &self,
        raw: &[RawUtterance],
        pcm: &[u8],
        sample_rate: u32,
    ) -> ExtractionReport {
        let result = self
            .guard(raw)
            .and_then(|()| callqa_audio::decode_pcm16(pcm, sample_rate).map_err(FeatureError::from))
            .and_then(|wave| self.extract(raw, &wave));
        ExtractionReport::from_result(Some(report::task_id(pcm)), result)
    }

    /// Rejects unusable transcripts before any audio is decoded.
    fn guard(&self, raw: &[RawUtterance]) -> Result<(), FeatureError> {
        if raw.is_empty() {
            return Err(FeatureError::EmptyTranscript);
        }
        if let Some((index, u)) = raw.iter().enumerate().find(|(_, u)| !u.has_finite_times()) {
            return Err(FeatureError::InvalidTimestamp {
                index,
                start: u.start,
                end: u.end,
            });
        }
        Ok(())
    }
}

/// Builder for [`Pipeline`].
pub struct PipelineBuilder {
    config: PipelineConfig,
    lexicon: Option<Lexicon>,
    roles: Option<Box<dyn RoleClassifier>>,
    pitch: Option<Arc<dyn PitchEstimator>>,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            lexicon: None,
            roles: None,
            pitch: None,
        }
    }

    /// Replaces the default Vietnamese lexicon.
    pub fn lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    /// Overrides the classifier selected by `role_strategy`.
    pub fn role_classifier(mut self, classifier: Box<dyn RoleClassifier>) -> Self {
        self.roles = Some(classifier);
        self
    }

    /// Overrides the YIN estimator built from the `pitch` config.
    pub fn pitch_estimator(mut self, estimator: Arc<dyn PitchEstimator>) -> Self {
        self.pitch = Some(estimator);
        self
    }

    /// Builds the pipeline, spawning the worker pool when `workers > 0`.
    pub fn build(self) -> Result<Pipeline, FeatureError> {
        let config = self.config;
        let lexicon = Arc::new(self.lexicon.unwrap_or_default().normalized());
        let pitch = self
            .pitch
            .unwrap_or_else(|| Arc::new(Yin::new(config.pitch.clone())));
        let roles = self
            .roles
            .unwrap_or_else(|| config.role_strategy.classifier());

        let pool = if config.workers > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.workers)
                .thread_name(|i| format!("callqa-worker-{i}"))
                .build()?;
            Some(pool)
        } else {
            None
        };

        Ok(Pipeline {
            acoustic: AcousticAnalyzer::new(lexicon.clone(), pitch, config.min_speech_duration),
            lexical: LexicalAnalyzer::new(lexicon.clone()),
            lexicon,
            roles,
            pool,
            config,
        })
    }
}
