//! Command-line support for call analysis tools.
//!
//! This crate provides profile storage, input loading and report output
//! shared by the `callqa` binary.

pub mod config;
pub mod output;
pub mod request;

pub use config::{load_config, Config, Context};
pub use output::{Output, OutputFormat};
pub use request::{load_request, load_transcript, RequestError};
