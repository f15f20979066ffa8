//! Snapshot comparison for new-listing detection.
//!
//! Computes the set difference between the current identity set and the
//! persisted seen set. An empty seen set means this is the first run: the
//! snapshot is established without reporting anything as new.

use std::collections::BTreeSet;

/// Outcome of comparing the current snapshot against persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    /// First run against empty state; nothing is reported as new.
    Baseline {
        /// Number of identities in the established snapshot
        count: usize,
    },

    /// Normal run; identities present now but absent last run.
    Changes {
        /// Newly appeared identities, lexicographically ordered
        new: Vec<String>,
    },
}

impl DiffOutcome {
    /// Whether this run established the baseline snapshot.
    pub fn is_baseline(&self) -> bool {
        matches!(self, Self::Baseline { .. })
    }

    /// Number of newly appeared identities (zero on a baseline run).
    pub fn new_count(&self) -> usize {
        match self {
            Self::Baseline { .. } => 0,
            Self::Changes { new } => new.len(),
        }
    }
}

/// Compare the current identity set against the persisted seen set.
///
/// `BTreeSet` iteration keeps the reported order lexicographic, so capped
/// notification output stays deterministic.
pub fn detect_new(current: &BTreeSet<String>, seen: &BTreeSet<String>) -> DiffOutcome {
    if seen.is_empty() {
        return DiffOutcome::Baseline {
            count: current.len(),
        };
    }

    DiffOutcome::Changes {
        new: current.difference(seen).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_seen_is_baseline() {
        let outcome = detect_new(&ids(&["1", "2"]), &ids(&[]));
        assert_eq!(outcome, DiffOutcome::Baseline { count: 2 });
        assert!(outcome.is_baseline());
        assert_eq!(outcome.new_count(), 0);
    }

    #[test]
    fn test_set_difference() {
        let outcome = detect_new(&ids(&["1", "2", "3"]), &ids(&["1"]));
        assert_eq!(
            outcome,
            DiffOutcome::Changes {
                new: vec!["2".to_string(), "3".to_string()]
            }
        );
    }

    #[test]
    fn test_no_changes() {
        let outcome = detect_new(&ids(&["1", "2"]), &ids(&["1", "2"]));
        assert_eq!(outcome, DiffOutcome::Changes { new: Vec::new() });
        assert_eq!(outcome.new_count(), 0);
    }

    #[test]
    fn test_removed_ids_are_not_reported() {
        let outcome = detect_new(&ids(&["1"]), &ids(&["1", "2"]));
        assert_eq!(outcome.new_count(), 0);
    }

    #[test]
    fn test_reported_order_is_lexicographic() {
        let outcome = detect_new(&ids(&["b", "a", "c"]), &ids(&["z"]));
        assert_eq!(
            outcome,
            DiffOutcome::Changes {
                new: vec!["a".to_string(), "b".to_string(), "c".to_string()]
            }
        );
    }

    #[test]
    fn test_reappearing_id_counts_as_new() {
        // Seen state reflects only the previous run; an id that dropped out
        // and came back is reported again.
        let outcome = detect_new(&ids(&["1", "2"]), &ids(&["1"]));
        assert_eq!(outcome.new_count(), 1);
    }
}
