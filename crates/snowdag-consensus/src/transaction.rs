//! Transaction DAG vertices.

use snowdag_ids::TxId;

/// Conflict discriminator reserved for the genesis vertex.
pub const GENESIS_DATA: i64 = -1;

/// A vertex in the transaction DAG.
///
/// `data` identifies the spend: transactions with equal `data` are
/// mutually conflicting and at most one of them may ever be accepted.
/// `chit` and `confidence` are the holding node's own vote state; they
/// are stripped at every ingress boundary and never trusted across
/// nodes. Transactions are compared by `id` throughout the engine.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Unique identifier, assigned at creation and never reused.
    pub id: TxId,

    /// Conflict-set discriminator.
    pub data: i64,

    /// Ordered ancestor edges. Empty only for the genesis vertex.
    pub parents: Vec<TxId>,

    /// Set at most once, when this transaction wins a quorum of votes.
    pub chit: bool,

    /// Monotonically non-decreasing count of descendant chit events
    /// this transaction has inherited as an ancestor.
    pub confidence: u64,
}

impl Transaction {
    /// Creates a fresh, unvoted transaction.
    pub fn new(id: TxId, data: i64, parents: Vec<TxId>) -> Self {
        Self {
            id,
            data,
            parents,
            chit: false,
            confidence: 0,
        }
    }

    /// The shared genesis vertex: no parents, chit already granted.
    pub fn genesis(id: TxId) -> Self {
        Self {
            id,
            data: GENESIS_DATA,
            parents: Vec::new(),
            chit: true,
            confidence: 0,
        }
    }

    /// Strips vote state from a received copy.
    ///
    /// Applied at every node's ingress boundary: a node never trusts
    /// the sender's chit or confidence and always re-earns both from
    /// its own sampling.
    #[must_use]
    pub fn reset_vote_state(mut self) -> Self {
        self.chit = false;
        self.confidence = 0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unvoted() {
        let tx = Transaction::new(TxId::from_bytes([1; 32]), 5, vec![TxId::ZERO]);
        assert!(!tx.chit);
        assert_eq!(tx.confidence, 0);
        assert_eq!(tx.data, 5);
    }

    #[test]
    fn test_genesis() {
        let g = Transaction::genesis(TxId::from_bytes([9; 32]));
        assert!(g.chit);
        assert_eq!(g.confidence, 0);
        assert_eq!(g.data, GENESIS_DATA);
        assert!(g.parents.is_empty());
    }

    #[test]
    fn test_reset_vote_state() {
        let mut tx = Transaction::new(TxId::from_bytes([1; 32]), 5, vec![]);
        tx.chit = true;
        tx.confidence = 7;

        let reset = tx.clone().reset_vote_state();
        assert!(!reset.chit);
        assert_eq!(reset.confidence, 0);
        assert_eq!(reset.id, tx.id);
        assert_eq!(reset.parents, tx.parents);

        // The original copy is untouched
        assert!(tx.chit);
        assert_eq!(tx.confidence, 7);
    }
}
