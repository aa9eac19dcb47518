//! Call-level aggregates.

use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::utterance::Utterance;

/// Aggregates over a whole call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CallMetadata {
    /// End time of the last utterance in seconds.
    pub duration: f64,
    /// Number of role changes between consecutive utterances.
    pub turns: usize,
    /// Share of the call spoken by the sales agent, in `[0, 1]`.
    pub ratio_sales: f64,
}

/// Computes [`CallMetadata`] from utterances in transcript order.
///
/// Gaps and overlaps between diarized spans are not corrected; overlapping
/// sales spans could exceed the call duration, so the ratio is clamped.
pub fn aggregate(utterances: &[Utterance]) -> CallMetadata {
    let duration = utterances.last().map_or(0.0, |u| u.end_time);
    let turns = utterances
        .windows(2)
        .filter(|w| w[0].role != w[1].role)
        .count();
    let ratio_sales = if duration > 0.0 {
        let sales: f64 = utterances
            .iter()
            .filter(|u| u.role == Role::Sales)
            .map(|u| u.duration)
            .sum();
        (sales / duration).clamp(0.0, 1.0)
    } else {
        0.0
    };

    CallMetadata {
        duration,
        turns,
        ratio_sales,
    }
}
