use crate::model::Record;
use indexmap::IndexSet;
use std::collections::HashSet;

/// Deduplication ledger scoped to one scrape run.
///
/// Tracks two independent sets:
/// - element tokens already inspected, so a still-visible element is not
///   re-probed on consecutive scans
/// - identities already admitted, so an entity re-rendered after a scroll is
///   never emitted twice
///
/// Both sets are monotonic within a run: once marked, never reconsidered.
#[derive(Debug, Default)]
pub struct Ledger {
    /// Opaque handle tokens already inspected
    inspected: HashSet<String>,

    /// Identities of admitted records, in admission order
    admitted: IndexSet<String>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an element token still needs probing. Read-only; callers mark
    /// the token via [`mark_inspected`](Self::mark_inspected) only after the
    /// probe completed without a stale fault, so a stale skip is retried on
    /// the next scan.
    pub fn should_process(&self, token: &str) -> bool {
        !self.inspected.contains(token)
    }

    /// Record that an element token has been fully inspected
    pub fn mark_inspected(&mut self, token: String) {
        self.inspected.insert(token);
    }

    /// Admit a record by identity. Returns true iff the identity was not
    /// previously admitted; false means discard, do not count toward target.
    pub fn admit(&mut self, record: &Record) -> bool {
        self.admitted.insert(record.identity().to_string())
    }

    /// Whether an identity has already been admitted
    pub fn is_admitted(&self, identity: &str) -> bool {
        self.admitted.contains(identity)
    }

    /// Number of admitted identities
    pub fn admitted_count(&self) -> usize {
        self.admitted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Identity;

    fn identity_record(handle: &str) -> Record {
        Record::Identity(Identity::new(handle).unwrap())
    }

    #[test]
    fn test_admit_is_idempotent() {
        // The same identity across N overlapping renders is admitted once,
        // for any N.
        let mut ledger = Ledger::new();
        let record = identity_record("alice");

        assert!(ledger.admit(&record));
        for _ in 0..10 {
            assert!(!ledger.admit(&record));
        }
        assert_eq!(ledger.admitted_count(), 1);
        assert!(ledger.is_admitted("alice"));
    }

    #[test]
    fn test_distinct_identities_all_admitted() {
        let mut ledger = Ledger::new();
        for handle in ["alice", "bob", "carol"] {
            assert!(ledger.admit(&identity_record(handle)));
        }
        assert_eq!(ledger.admitted_count(), 3);
    }

    #[test]
    fn test_element_tokens_monotonic() {
        let mut ledger = Ledger::new();
        assert!(ledger.should_process("el-1"));

        ledger.mark_inspected("el-1".to_string());
        assert!(!ledger.should_process("el-1"));
        assert!(ledger.should_process("el-2"));

        // Marking again changes nothing
        ledger.mark_inspected("el-1".to_string());
        assert!(!ledger.should_process("el-1"));
    }

    #[test]
    fn test_sets_are_independent() {
        let mut ledger = Ledger::new();
        ledger.mark_inspected("el-1".to_string());
        assert!(!ledger.is_admitted("el-1"));
        assert!(ledger.admit(&identity_record("el-1")));
    }
}
