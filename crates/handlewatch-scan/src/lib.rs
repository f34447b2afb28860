//! handlewatch-scan: Concurrent handle scanning and risk scoring.
//!
//! Fans a handle out to every registered probe module under a concurrency
//! ceiling and a shared deadline, merges whatever comes back into a
//! [`ScanSession`](handlewatch_core::ScanSession), and scores it.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod report;
pub mod scoring;
pub mod target;

pub use coordinator::ScanCoordinator;
pub use error::ScanError;
pub use scoring::{RiskScorer, ScoringConfig};
