//! Report envelope printed by the CLI.

use chrono::{DateTime, Utc};
use serde::Serialize;

use handlewatch_core::{ScanSession, Severity};

use crate::scoring::RiskScorer;

/// Scored sessions for one CLI invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    /// Highest severity across all sessions.
    pub overall_severity: Severity,
    /// Highest session score. Each handle is scored on its own, so this is
    /// not the score of all findings pooled together.
    pub risk_score: f64,
    pub sessions: Vec<ScanSession>,
}

impl ScanReport {
    /// Score each session and wrap them up.
    pub fn new(mut sessions: Vec<ScanSession>, scorer: &RiskScorer) -> Self {
        let mut risk_score: f64 = 0.0;
        let mut overall_severity = Severity::Info;

        for session in &mut sessions {
            risk_score = risk_score.max(scorer.score(session));
            overall_severity = overall_severity.max(scorer.overall_severity(session));
        }

        Self {
            generated_at: Utc::now(),
            overall_severity,
            risk_score,
            sessions,
        }
    }

    pub fn total_findings(&self) -> usize {
        self.sessions.iter().map(|s| s.findings.len()).sum()
    }
}
