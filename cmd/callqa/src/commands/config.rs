//! Profile management commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use callqa_cli::{load_request, Context as CliContext};
use callqa_features::{PipelineConfig, RoleStrategy};

use super::{get_config, print_success};
use crate::Cli;

/// Manage analysis profiles.
///
/// Contexts hold named pipeline settings, similar to kubectl's context
/// management.
///
/// Configuration is stored in ~/.callqa/callqa/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add or replace a context
    ///
    /// Starts from a pipeline config file given with -f, or from the
    /// defaults, then applies the flags.
    #[command(name = "add-context")]
    AddContext {
        /// Context name
        name: String,
        /// Silence threshold in dB
        #[arg(long)]
        top_db: Option<f64>,
        /// Interruption gap in seconds
        #[arg(long)]
        interruption_gap: Option<f64>,
        /// Worker threads (0 = one per core)
        #[arg(long)]
        workers: Option<usize>,
        /// Sales speaker strategy: talk-time or first-speaker
        #[arg(long)]
        role_strategy: Option<RoleStrategy>,
        /// Lexicon file, relative to the config directory or absolute
        #[arg(long)]
        lexicon_file: Option<PathBuf>,
    },
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// Display the current context
    #[command(name = "get-context")]
    GetContext,
    /// List all contexts
    #[command(name = "list-contexts", alias = "get-contexts")]
    ListContexts,
    /// View the current configuration
    View,
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::AddContext {
                name,
                top_db,
                interruption_gap,
                workers,
                role_strategy,
                lexicon_file,
            } => {
                let mut cfg = get_config(cli)?;

                let mut pipeline: PipelineConfig = match cli.input.as_deref() {
                    Some(path) => load_request(path)?,
                    None => PipelineConfig::default(),
                };
                if let Some(v) = top_db {
                    pipeline.silence.top_db = *v;
                }
                if let Some(v) = interruption_gap {
                    pipeline.interruption_gap = *v;
                }
                if let Some(v) = workers {
                    pipeline.workers = *v;
                }
                if let Some(v) = role_strategy {
                    pipeline.role_strategy = *v;
                }

                let ctx = CliContext {
                    pipeline,
                    lexicon_file: lexicon_file.clone(),
                    ..Default::default()
                };
                cfg.add_context(name, ctx)?;
                print_success(&format!("Context \"{}\" added successfully", name));
                Ok(())
            }

            ConfigSubcommand::DeleteContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::GetContext => {
                let cfg = get_config(cli)?;
                if cfg.current_context.is_empty() {
                    println!("No current context set");
                } else {
                    println!("{}", cfg.current_context);
                }
                Ok(())
            }

            ConfigSubcommand::ListContexts => {
                let cfg = get_config(cli)?;

                if cfg.contexts.is_empty() {
                    println!("No contexts configured");
                    return Ok(());
                }

                println!(
                    "{:<8} {:<20} {:<14} {:<8} {}",
                    "CURRENT", "NAME", "ROLES", "TOP_DB", "LEXICON"
                );
                for (name, ctx) in &cfg.contexts {
                    let current = if name == &cfg.current_context { "*" } else { "" };
                    let roles = match ctx.pipeline.role_strategy {
                        RoleStrategy::TalkTime => "talk-time",
                        RoleStrategy::FirstSpeaker => "first-speaker",
                    };
                    let lexicon = ctx
                        .lexicon_file
                        .as_ref()
                        .map_or("(built-in)".to_string(), |p| p.display().to_string());
                    println!(
                        "{:<8} {:<20} {:<14} {:<8} {}",
                        current, name, roles, ctx.pipeline.silence.top_db, lexicon
                    );
                }

                Ok(())
            }

            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;

                println!("Config file: {}", cfg.path().display());
                println!("Current context: {}", cfg.current_context);
                println!("Contexts: {}", cfg.contexts.len());

                for (name, ctx) in &cfg.contexts {
                    println!("\n  {}:", name);
                    if let Some(path) = &ctx.lexicon_file {
                        println!("    Lexicon: {}", path.display());
                    }
                    let pipeline = serde_yaml::to_string(&ctx.pipeline)?;
                    for line in pipeline.lines() {
                        println!("    {}", line);
                    }
                }

                Ok(())
            }
        }
    }
}
