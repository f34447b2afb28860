//! Core domain types for handle scanning.
//!
//! A probe module reports [`Finding`]s about one handle; the coordinator
//! collects them into a [`ScanSession`], which the scorer then annotates
//! with a risk score.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Session ID ────────────────────────────────────────────────────

/// Unique identifier for a scan session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Severity ──────────────────────────────────────────────────────

/// Severity of a finding, ordered `Info < Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Handle status ─────────────────────────────────────────────────

/// What a platform said about a handle.
///
/// Serialized as a bare lowercase string; anything other than the three
/// well-known values round-trips through [`HandleStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HandleStatus {
    /// A profile is registered under the handle.
    Exists,
    /// The handle is unclaimed and can be registered by anyone.
    Available,
    /// The handle is taken but the account is suspended.
    Suspended,
    /// Module-defined status.
    Other(String),
}

impl HandleStatus {
    pub fn as_str(&self) -> &str {
        match self {
            HandleStatus::Exists => "exists",
            HandleStatus::Available => "available",
            HandleStatus::Suspended => "suspended",
            HandleStatus::Other(s) => s,
        }
    }

    /// Severity a probe module assigns at observation time.
    ///
    /// The scorer later overrides this for the well-known statuses.
    pub fn probe_severity(&self) -> Severity {
        match self {
            HandleStatus::Available | HandleStatus::Suspended => Severity::Low,
            HandleStatus::Exists | HandleStatus::Other(_) => Severity::Info,
        }
    }
}

impl From<String> for HandleStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "exists" => HandleStatus::Exists,
            "available" => HandleStatus::Available,
            "suspended" => HandleStatus::Suspended,
            _ => HandleStatus::Other(s),
        }
    }
}

impl From<HandleStatus> for String {
    fn from(status: HandleStatus) -> Self {
        match status {
            HandleStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for HandleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Finding ───────────────────────────────────────────────────────

/// One observation from one probe module about one handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    /// Name of the module that produced this finding.
    pub module_name: String,
    /// Stable category key, e.g. `github_profile`.
    pub indicator: String,
    /// The probed handle.
    pub value: String,
    pub status: HandleStatus,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub observed_at: DateTime<Utc>,
}

impl Finding {
    /// Build a finding whose severity is derived from `status`.
    pub fn new(
        module_name: &str,
        indicator: &str,
        value: &str,
        status: HandleStatus,
        description: impl Into<String>,
    ) -> Self {
        Self {
            module_name: module_name.to_string(),
            indicator: indicator.to_string(),
            value: value.to_string(),
            severity: status.probe_severity(),
            status,
            description: description.into(),
            metadata: BTreeMap::new(),
            observed_at: Utc::now(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

// ── Module failure ────────────────────────────────────────────────

/// A probe module that errored during a scan. Kept for diagnostics only;
/// it never contributes to the score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleFailure {
    pub module_name: String,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

impl ModuleFailure {
    pub fn new(module_name: &str, error: impl fmt::Display) -> Self {
        Self {
            module_name: module_name.to_string(),
            error: error.to_string(),
            failed_at: Utc::now(),
        }
    }
}

// ── Scan session ──────────────────────────────────────────────────

/// The aggregate result of scanning one handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanSession {
    pub id: SessionId,
    pub target: String,
    /// Findings in arrival order. Order across modules is not stable.
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub module_failures: Vec<ModuleFailure>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Only meaningful once the scorer has run.
    pub risk_score: f64,
}

impl ScanSession {
    /// Open a session for `target` with no findings.
    pub fn start(target: &str) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            target: target.to_string(),
            findings: Vec::new(),
            module_failures: Vec::new(),
            started_at: now,
            ended_at: now,
            risk_score: 0.0,
        }
    }

    /// Append one module's findings, keeping that module's order.
    pub fn record_findings(&mut self, findings: Vec<Finding>) {
        self.findings.extend(findings);
    }

    pub fn record_failure(&mut self, failure: ModuleFailure) {
        self.module_failures.push(failure);
    }

    /// Stamp the end time. Never earlier than `started_at`.
    pub fn finish(&mut self) {
        self.ended_at = Utc::now().max(self.started_at);
    }

    pub fn duration(&self) -> TimeDelta {
        self.ended_at - self.started_at
    }
}
