//! Lifecycle events emitted while a scan runs.
//!
//! Observers subscribe through the coordinator and receive events in the
//! order the aggregator processes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SessionId;

/// An event emitted by the scan coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEvent {
    pub session_id: SessionId,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl ScanEvent {
    pub fn new(session_id: SessionId, payload: EventPayload) -> Self {
        Self {
            session_id,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// The event payload, tagged by type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event_type")]
pub enum EventPayload {
    /// Modules were dispatched for a target.
    ScanStarted { target: String, module_count: u32 },
    /// A module reported, possibly with zero findings.
    ModuleCompleted { module: String, findings: u32 },
    /// A module errored; its failure is recorded on the session.
    ModuleFailed { module: String, error: String },
    /// The aggregator stopped collecting.
    ScanCompleted {
        findings: u32,
        failures: u32,
        duration_ms: u64,
        deadline_exceeded: bool,
    },
}
