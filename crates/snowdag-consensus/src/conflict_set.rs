//! Conflict sets: preference tracking among same-`data` transactions.

use snowdag_ids::TxId;

/// Tracks the preferred transaction among all transactions sharing one
/// `data` value, plus the stability streak used by the beta2
/// acceptance rule.
///
/// Invariant: `pref` only moves to a member whose confidence strictly
/// exceeds the current preference's, so the preferred confidence never
/// decreases.
#[derive(Debug, Clone)]
pub struct ConflictSet {
    /// Currently preferred member.
    pub pref: TxId,

    /// Most recent member to receive a confidence update.
    pub last: TxId,

    /// Consecutive confidence updates for which the updated member
    /// stayed the same; reset whenever a different member is touched.
    pub count: u64,

    /// Distinct members seen so far; 1 means uncontested.
    pub size: usize,
}

impl ConflictSet {
    /// Creates a set for the first member observed with a given `data`.
    pub fn new(first: TxId) -> Self {
        Self {
            pref: first,
            last: first,
            count: 0,
            size: 1,
        }
    }

    /// True if no conflicting transaction has been seen.
    pub fn is_uncontested(&self) -> bool {
        self.size == 1
    }

    /// Applies one confidence update for `member`, whose confidence is
    /// now `member_conf` while the current preference holds
    /// `pref_conf`.
    pub fn record(&mut self, member: TxId, member_conf: u64, pref_conf: u64) {
        if member_conf > pref_conf {
            self.pref = member;
        }
        if member != self.last {
            self.last = member;
            self.count = 0;
        } else {
            self.count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_id(byte: u8) -> TxId {
        TxId::from_bytes([byte; 32])
    }

    #[test]
    fn test_new_set() {
        let a = make_id(1);
        let cs = ConflictSet::new(a);
        assert_eq!(cs.pref, a);
        assert_eq!(cs.last, a);
        assert_eq!(cs.count, 0);
        assert!(cs.is_uncontested());
    }

    #[test]
    fn test_preference_needs_strictly_greater_confidence() {
        let a = make_id(1);
        let b = make_id(2);
        let mut cs = ConflictSet::new(a);
        cs.size = 2;

        // Equal confidence does not move the preference
        cs.record(b, 3, 3);
        assert_eq!(cs.pref, a);

        // Strictly greater does
        cs.record(b, 4, 3);
        assert_eq!(cs.pref, b);
    }

    #[test]
    fn test_streak_counting() {
        let a = make_id(1);
        let b = make_id(2);
        let mut cs = ConflictSet::new(a);
        cs.size = 2;

        // First update touches a (a == last), streak grows
        cs.record(a, 1, 1);
        assert_eq!(cs.count, 1);
        cs.record(a, 2, 2);
        assert_eq!(cs.count, 2);

        // Touching a different member resets the streak
        cs.record(b, 1, 2);
        assert_eq!(cs.last, b);
        assert_eq!(cs.count, 0);

        cs.record(b, 2, 2);
        assert_eq!(cs.count, 1);
    }
}
