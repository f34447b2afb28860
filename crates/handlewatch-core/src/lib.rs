//! handlewatch-core: Shared types, events, and error handling for handlewatch.
//!
//! This crate provides the foundational types used across all handlewatch components:
//! - Findings, handle statuses, and severities produced by probe modules
//! - The scan session envelope that carries findings and the risk score
//! - Lifecycle events emitted while a scan runs
//! - Common error types

pub mod error;
pub mod events;
pub mod types;

pub use error::HandlewatchError;
pub use types::{Finding, HandleStatus, ModuleFailure, ScanSession, SessionId, Severity};
