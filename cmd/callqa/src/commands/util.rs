//! Utility functions for CLI commands.

use std::path::{Path, PathBuf};

use callqa_cli::{load_config, Config, Context, Output, OutputFormat};
use callqa_features::Lexicon;

use crate::Cli;

const APP_NAME: &str = "callqa";

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(APP_NAME, cli.config.as_deref())
}

/// Resolves the profile to analyze with, plus the directory relative
/// lexicon paths are resolved against.
///
/// Without `-c` and without a current context the built-in defaults apply.
pub fn get_profile(cli: &Cli) -> anyhow::Result<(Context, Option<PathBuf>)> {
    let cfg = get_config(cli)?;
    let dir = cfg.dir().map(Path::to_path_buf);
    match cfg.resolve_context(cli.context.as_deref()) {
        Some(ctx) => Ok((ctx.clone(), dir)),
        None => match cli.context.as_deref() {
            Some(name) if !name.is_empty() => anyhow::bail!("context '{}' not found", name),
            _ => Ok((Context::default(), dir)),
        },
    }
}

/// Loads the lexicon from `--lexicon` if given, otherwise from the profile.
pub fn resolve_lexicon(
    override_path: Option<&Path>,
    ctx: &Context,
    dir: Option<&Path>,
) -> anyhow::Result<Lexicon> {
    Ok(match override_path {
        Some(path) => callqa_cli::load_request(path)?,
        None => ctx.lexicon(dir)?,
    })
}

/// Requires the transcript file to be provided.
pub fn require_input_file(cli: &Cli) -> anyhow::Result<&str> {
    cli.input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("transcript file is required, use -f flag"))
}

/// Builds the output sink from the global flags.
pub fn output(cli: &Cli) -> Output {
    Output::new(
        OutputFormat::from_json_flag(cli.json),
        cli.output.as_ref().map(PathBuf::from),
    )
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}
