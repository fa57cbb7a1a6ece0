//! Error types for the consensus engine.

use snowdag_ids::TxId;
use thiserror::Error;

/// Result type for consensus operations.
pub type Result<T> = std::result::Result<T, ConsensusError>;

/// Errors that can occur during consensus operations.
///
/// The simulation has no transient failures: every variant here is
/// either a programming-invariant violation or an unusable
/// configuration, and none of them is retried.
#[derive(Debug, Error, Clone)]
pub enum ConsensusError {
    /// A peer was asked for a transaction it does not hold. Ancestor
    /// pulls only request ids taken from a transaction the sender just
    /// shipped, so this is unreachable unless an invariant broke.
    #[error("unknown transaction: {0}")]
    UnknownTransaction(TxId),

    /// Parent selection found no attachment point for a new
    /// transaction; the DAG is stuck for that generation attempt.
    #[error("no viable parents for new transaction")]
    NoViableParents,

    /// Invalid consensus parameters.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A node index outside the network was addressed.
    #[error("unknown node index: {0}")]
    UnknownNode(usize),
}
