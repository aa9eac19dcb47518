//! callqa - acoustic and lexical feature extraction for recorded sales calls.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{ConfigCommand, ExtractCommand, LexiconCommand};

/// callqa - feature extraction for recorded sales calls.
///
/// Reads a diarized transcript (-f, YAML or JSON) and the call audio, then
/// reports per-utterance speaking rate, loudness, pitch, silence and word-list
/// counts together with call-level aggregates.
///
/// Analysis profiles are stored in ~/.callqa/callqa/ and support multiple
/// contexts, similar to kubectl's context management.
#[derive(Parser)]
#[command(name = "callqa")]
#[command(about = "Sales call feature extraction tool")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.callqa/callqa/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Transcript file (YAML or JSON, "-" for stdin)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage analysis profiles
    Config(ConfigCommand),
    /// Extract features from a call recording
    Extract(ExtractCommand),
    /// Print the effective lexicon
    Lexicon(LexiconCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay parseable.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Extract(cmd) => cmd.run(&cli).await,
        Commands::Lexicon(cmd) => cmd.run(&cli).await,
    }
}
