//! CLI commands module.

mod config;
mod extract;
mod lexicon;
mod util;

pub use config::ConfigCommand;
pub use extract::ExtractCommand;
pub use lexicon::LexiconCommand;

pub(crate) use util::*;
