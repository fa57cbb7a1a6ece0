//! Identifier types for the snowdag simulator.

mod id;

pub use id::{IdError, TxId};

/// Length of a transaction identifier in bytes.
pub const ID_LEN: usize = 32;
