//! Feature extraction command.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use tracing::info;

use callqa_cli::load_transcript;
use callqa_features::{Pipeline, RoleStrategy};

use super::{get_profile, output, require_input_file, resolve_lexicon};
use crate::Cli;

/// Extract per-utterance features and call metadata.
///
/// The transcript is read from -f. Audio is a WAV, MP3 or M4A file, or
/// headerless 16-bit mono PCM when --sample-rate is given. Flags override the values of
/// the selected context. The report is printed even on failure; the exit
/// code is non-zero when its status is -1.
#[derive(Args)]
pub struct ExtractCommand {
    /// Call recording
    #[arg(long)]
    audio: PathBuf,

    /// Read the audio as raw PCM16 at this sample rate
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Silence threshold below the loudest frame, in dB
    #[arg(long)]
    top_db: Option<f64>,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    workers: Option<usize>,

    /// Lexicon file (YAML or JSON) replacing the profile's lexicon
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// How the sales speaker is chosen: talk-time or first-speaker
    #[arg(long)]
    role_strategy: Option<RoleStrategy>,
}

impl ExtractCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let input = require_input_file(cli)?;
        let raw = load_transcript(input)
            .with_context(|| format!("failed to load transcript {}", input))?;

        let (ctx, dir) = get_profile(cli)?;
        let mut config = ctx.pipeline.clone();
        if let Some(top_db) = self.top_db {
            config.silence.top_db = top_db;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(strategy) = self.role_strategy {
            config.role_strategy = strategy;
        }
        let lexicon = resolve_lexicon(self.lexicon.as_deref(), &ctx, dir.as_deref())?;

        let audio = tokio::fs::read(&self.audio)
            .await
            .with_context(|| format!("failed to read audio {}", self.audio.display()))?;
        info!(
            utterances = raw.len(),
            audio_bytes = audio.len(),
            "inputs loaded"
        );

        let sample_rate = self.sample_rate;
        let report = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
            let pipeline = Pipeline::builder(config).lexicon(lexicon).build()?;
            Ok(match sample_rate {
                Some(sr) => pipeline.extract_pcm16(&raw, &audio, sr),
                None => pipeline.extract_bytes(&raw, &audio),
            })
        })
        .await??;

        output(cli).write(&report)?;
        if !report.is_success() {
            anyhow::bail!("extraction failed: {}", report.message);
        }
        Ok(())
    }
}
