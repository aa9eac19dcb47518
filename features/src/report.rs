//! Status envelope returned to callers that hand over raw audio bytes.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::FeatureError;
use crate::metadata::CallMetadata;
use crate::pipeline::Extraction;
use crate::record::SegmentRecord;
use crate::summary::CallSummary;

pub const STATUS_OK: i32 = 1;
pub const STATUS_FAILED: i32 = -1;

const SUCCESS_MESSAGE: &str = "Features and metadata extracted successfully";

/// Modulus applied to the audio digest to form a task id.
const TASK_ID_MODULUS: u64 = 1_000_000;

/// Outcome of one extraction. Failures carry only status, task id and
/// message; no partial results are ever returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub status: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CallMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CallSummary>,
    pub message: String,
}

impl ExtractionReport {
    pub fn success(task_id: Option<String>, extraction: Extraction) -> Self {
        Self {
            status: STATUS_OK,
            task_id,
            segments: Some(extraction.segments),
            metadata: Some(extraction.metadata),
            summary: Some(extraction.summary),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn failure(task_id: Option<String>, err: &FeatureError) -> Self {
        Self {
            status: STATUS_FAILED,
            task_id,
            segments: None,
            metadata: None,
            summary: None,
            message: err.to_string(),
        }
    }

    pub fn from_result(task_id: Option<String>, result: Result<Extraction, FeatureError>) -> Self {
        match result {
            Ok(extraction) => Self::success(task_id, extraction),
            Err(err) => {
                warn!(error = %err, "extraction failed");
                Self::failure(task_id, &err)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Derives a stable decimal id from the audio content.
///
/// The SHA-256 digest, read as a big-endian integer, reduced modulo 10^6.
pub fn task_id(audio: &[u8]) -> String {
    let digest = Sha256::digest(audio);
    let id = digest
        .iter()
        .fold(0u64, |acc, &b| (acc * 256 + b as u64) % TASK_ID_MODULUS);
    id.to_string()
}
