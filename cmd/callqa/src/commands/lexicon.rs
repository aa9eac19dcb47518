//! Lexicon inspection command.

use std::path::PathBuf;

use clap::Args;

use super::{get_profile, output, resolve_lexicon};
use crate::Cli;

/// Print the lexicon a run would use.
///
/// Without a profile lexicon this is the built-in Vietnamese set, which
/// makes a convenient starting point for a locale-specific file.
#[derive(Args)]
pub struct LexiconCommand {
    /// Lexicon file to show instead of the profile's
    #[arg(long)]
    lexicon: Option<PathBuf>,
}

impl LexiconCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let (ctx, dir) = get_profile(cli)?;
        let lexicon = resolve_lexicon(self.lexicon.as_deref(), &ctx, dir.as_deref())?;
        output(cli).write(&lexicon)
    }
}
