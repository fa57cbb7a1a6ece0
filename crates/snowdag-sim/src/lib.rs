//! Driver library for the snowdag simulator.
//!
//! Holds everything the binary needs around the consensus engine:
//! configuration, the generation/audit driver, and DOT output.

pub mod config;
pub mod dot;
pub mod driver;
