//! Loading transcripts and lexicons from YAML or JSON files.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use callqa_features::{RawUtterance, Transcript};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for input file loading.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read file: {0}")]
    ReadFile(#[from] io::Error),
    #[error("failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("failed to parse input (tried YAML and JSON)")]
    ParseFailed,
}

/// Loads a YAML or JSON document, choosing the parser by extension.
pub fn load_request<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, RequestError> {
    let data = fs::read(path.as_ref())?;
    parse_request(&data, path.as_ref())
}

/// Parses a document by extension; unknown extensions try YAML, then JSON.
pub fn parse_request<T: DeserializeOwned>(
    data: &[u8],
    path: impl AsRef<Path>,
) -> Result<T, RequestError> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_slice(data)?),
        Some("json") => Ok(serde_json::from_slice(data)?),
        _ => parse_any(data),
    }
}

fn parse_any<T: DeserializeOwned>(data: &[u8]) -> Result<T, RequestError> {
    if let Ok(v) = serde_json::from_slice(data) {
        return Ok(v);
    }
    if let Ok(v) = serde_yaml::from_slice(data) {
        return Ok(v);
    }
    Err(RequestError::ParseFailed)
}

/// Reads a document from stdin.
pub fn load_request_from_stdin<T: DeserializeOwned>() -> Result<T, RequestError> {
    let mut data = Vec::new();
    io::stdin().read_to_end(&mut data)?;
    parse_any(&data)
}

/// Loads a diarized transcript from a file, or from stdin when `path` is
/// `-`. Both the bare segment list and the `{dialogue: [...]}` shape are
/// accepted.
pub fn load_transcript(path: impl AsRef<Path>) -> Result<Vec<RawUtterance>, RequestError> {
    let transcript: Transcript = if path.as_ref() == Path::new("-") {
        load_request_from_stdin()?
    } else {
        load_request(path)?
    };
    Ok(transcript.into_utterances())
}
