//! Sales-over-customer interruption flags.

use crate::role::Role;
use crate::utterance::Utterance;

/// Default gap in seconds below which a sales turn counts as cutting in.
pub const DEFAULT_GAP: f64 = 0.3;

/// Returns true when `cur` is a sales turn starting less than `gap` seconds
/// after the customer turn `prev` ended.
///
/// Only the agent interrupting the customer is flagged.
pub fn interrupts(prev: &Utterance, cur: &Utterance, gap: f64) -> bool {
    cur.role == Role::Sales
        && prev.role == Role::Customer
        && cur.start_time - prev.end_time < gap
}

/// Flags each utterance. The first utterance is never interrupted.
pub fn detect(utterances: &[Utterance], gap: f64) -> Vec<bool> {
    let mut flags = Vec::with_capacity(utterances.len());
    if !utterances.is_empty() {
        flags.push(false);
    }
    flags.extend(utterances.windows(2).map(|w| interrupts(&w[0], &w[1], gap)));
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::RawUtterance;
    use crate::utterance::CorruptionRule;

    fn utt(role: Role, start: f64, end: f64) -> Utterance {
        Utterance::new(
            &RawUtterance::new("x", start, end, ""),
            role,
            &CorruptionRule::default(),
        )
    }

    #[test]
    fn sales_cutting_in_is_flagged() {
        let u = vec![
            utt(Role::Customer, 0.0, 5.0),
            utt(Role::Sales, 5.1, 8.0),
            utt(Role::Customer, 8.05, 9.0),
            utt(Role::Sales, 9.5, 10.0),
        ];
        assert_eq!(detect(&u, DEFAULT_GAP), vec![false, true, false, false]);
    }

    #[test]
    fn overlap_counts_as_interruption() {
        let u = vec![utt(Role::Customer, 0.0, 5.0), utt(Role::Sales, 4.0, 6.0)];
        assert_eq!(detect(&u, DEFAULT_GAP), vec![false, true]);
    }

    #[test]
    fn same_role_never_interrupts() {
        let u = vec![utt(Role::Sales, 0.0, 5.0), utt(Role::Sales, 5.0, 6.0)];
        assert_eq!(detect(&u, DEFAULT_GAP), vec![false, false]);
    }

    #[test]
    fn gap_boundary_is_exclusive() {
        let prev = utt(Role::Customer, 0.0, 1.0);
        assert!(!interrupts(&prev, &utt(Role::Sales, 1.5, 2.0), 0.5));
        assert!(interrupts(&prev, &utt(Role::Sales, 1.25, 2.0), 0.5));
    }

    #[test]
    fn empty_and_single() {
        assert!(detect(&[], DEFAULT_GAP).is_empty());
        assert_eq!(detect(&[utt(Role::Sales, 0.0, 1.0)], DEFAULT_GAP), vec![false]);
    }
}
