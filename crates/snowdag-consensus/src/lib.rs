//! Avalanche-style DAG consensus engine.
//!
//! A leaderless, metastable consensus protocol over a directed acyclic
//! graph of transactions: every node repeatedly samples random peers,
//! asks them to vote on transactions it has not yet decided about, and
//! accumulates the answers into per-conflict-set preferences until
//! acceptance becomes irrevocable.
//!
//! # Architecture
//!
//! - **Transaction**: DAG vertex carrying a conflict discriminator and
//!   local vote state
//! - **ConflictSet**: preference and stability tracking among
//!   transactions that spend the same value
//! - **Node**: per-participant state machine (DAG, conflict sets,
//!   query and acceptance bookkeeping, the sampling loop)
//! - **Network**: synchronous round barrier over a set of nodes with a
//!   shared seeded RNG
//!
//! # Example
//!
//! ```
//! use snowdag_consensus::{Network, Parameters};
//!
//! let params = Parameters::new(1, 0.8, 1, 150);
//! let mut network = Network::new(2, params, 42).unwrap();
//! network.generate(0, 5).unwrap();
//! network.run_to_quiescence().unwrap();
//! ```

mod conflict_set;
mod error;
mod network;
mod node;
mod parameters;
mod transaction;

pub use conflict_set::ConflictSet;
pub use error::{ConsensusError, Result};
pub use network::Network;
pub use node::{Node, TxSource};
pub use parameters::Parameters;
pub use transaction::{Transaction, GENESIS_DATA};

pub use snowdag_ids::TxId;
