// ── Operation sequencing ──
//
// Async completions can arrive in any order. Every operation takes a ticket
// when it starts; when it finishes, the ledger decides whether its result may
// still be applied. Per key, the newest issued operation wins: an older
// completion that lands after a newer one has been applied is discarded.
// Advancing the generation invalidates every outstanding ticket at once.

use std::collections::HashMap;
use std::hash::Hash;

/// Proof that an operation was started, checked when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    seq: u64,
    generation: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What to do with a completed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Newest result for its key so far; apply it.
    Apply,
    /// A newer operation on the same key has already been applied.
    Stale,
    /// Issued before the owning view was closed.
    Expired,
}

impl Settlement {
    pub fn is_apply(self) -> bool {
        self == Self::Apply
    }
}

#[derive(Debug)]
pub struct OpLedger<K> {
    next_seq: u64,
    generation: u64,
    settled: HashMap<K, u64>,
}

impl<K> Default for OpLedger<K> {
    fn default() -> Self {
        Self {
            next_seq: 1,
            generation: 0,
            settled: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> OpLedger<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an operation on `key`.
    pub fn issue(&mut self, key: K) -> Ticket<K> {
        let seq = self.next_seq;
        self.next_seq += 1;
        Ticket {
            key,
            seq,
            generation: self.generation,
        }
    }

    /// Decide the fate of a finished operation. An `Apply` is recorded, so
    /// any older ticket for the same key settles as `Stale` afterwards.
    pub fn settle(&mut self, ticket: &Ticket<K>) -> Settlement {
        if ticket.generation != self.generation {
            return Settlement::Expired;
        }
        match self.settled.get(&ticket.key) {
            Some(&applied) if applied >= ticket.seq => Settlement::Stale,
            _ => {
                self.settled.insert(ticket.key.clone(), ticket.seq);
                Settlement::Apply
            }
        }
    }

    /// Whether `ticket` could still be applied, without recording anything.
    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        ticket.generation == self.generation
            && self
                .settled
                .get(&ticket.key)
                .is_none_or(|&applied| applied < ticket.seq)
    }

    /// Stop tracking `key` once its record is gone. Later completions for
    /// it settle as `Apply` again, so callers must not let them recreate
    /// the record.
    pub fn forget(&mut self, key: &K) {
        self.settled.remove(key);
    }

    /// Invalidate every outstanding ticket.
    pub fn advance_generation(&mut self) {
        self.generation += 1;
        self.settled.clear();
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_issue_wins_regardless_of_completion_order() {
        let mut ledger = OpLedger::new();
        let older = ledger.issue(5_u64);
        let newer = ledger.issue(5_u64);

        assert_eq!(ledger.settle(&newer), Settlement::Apply);
        assert_eq!(ledger.settle(&older), Settlement::Stale);
    }

    #[test]
    fn in_order_completions_all_apply() {
        let mut ledger = OpLedger::new();
        let first = ledger.issue("a");
        let second = ledger.issue("a");

        assert!(ledger.settle(&first).is_apply());
        assert!(ledger.settle(&second).is_apply());
    }

    #[test]
    fn keys_are_independent() {
        let mut ledger = OpLedger::new();
        let a = ledger.issue(1_u64);
        let b = ledger.issue(2_u64);

        assert!(ledger.settle(&b).is_apply());
        assert!(ledger.settle(&a).is_apply());
    }

    #[test]
    fn forget_drops_the_key() {
        let mut ledger = OpLedger::new();
        let older = ledger.issue(9_u64);
        let newer = ledger.issue(9_u64);
        assert!(ledger.settle(&newer).is_apply());
        assert!(!ledger.is_current(&older));

        ledger.forget(&9);

        assert!(ledger.settled.is_empty());
        assert!(ledger.is_current(&older));
    }

    #[test]
    fn generation_expires_outstanding_tickets() {
        let mut ledger = OpLedger::new();
        let ticket = ledger.issue(());
        assert!(ledger.is_current(&ticket));

        ledger.advance_generation();

        assert!(!ledger.is_current(&ticket));
        assert_eq!(ledger.settle(&ticket), Settlement::Expired);
        let fresh = ledger.issue(());
        assert!(ledger.settle(&fresh).is_apply());
    }
}
