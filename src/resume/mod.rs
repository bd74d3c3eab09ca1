//! Resume capability
//!
//! A single-line checkpoint file names the next unfetched calendar day.

/// Single-date checkpoint file
pub mod checkpoint;

pub use checkpoint::{CheckpointError, CheckpointStore};
