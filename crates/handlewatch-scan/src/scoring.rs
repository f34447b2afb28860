//! Risk scoring for scan sessions.
//!
//! Formula: `risk = Σ weight(indicator) × multiplier(status)`, clamped to
//! `[0, 100]`. An unclaimed handle is an impersonation surface and weighs
//! most; an existing profile is informational and weighs least.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use handlewatch_core::error::{HandlewatchError, Result};
use handlewatch_core::{HandleStatus, ScanSession, Severity};

/// Score ceiling.
pub const MAX_SCORE: f64 = 100.0;

/// Weight for indicators missing from the table.
pub const DEFAULT_WEIGHT: f64 = 5.0;

/// Scoring configuration: indicator weights and the fallback weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Base weight per indicator key.
    #[serde(default = "default_weights")]
    pub weights: HashMap<String, f64>,
    /// Weight for unknown indicators (default 5.0).
    #[serde(default = "default_weight")]
    pub default_weight: f64,
}

fn default_weights() -> HashMap<String, f64> {
    HashMap::from([
        ("github_profile".to_string(), 10.0),
        ("twitter_profile".to_string(), 15.0),
        ("instagram_profile".to_string(), 12.0),
    ])
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: default_weights(),
            default_weight: default_weight(),
        }
    }
}

impl ScoringConfig {
    /// A config with exactly the given weights and the default fallback.
    pub fn with_weights<I, K>(weights: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            weights: weights.into_iter().map(|(k, w)| (k.into(), w)).collect(),
            default_weight: DEFAULT_WEIGHT,
        }
    }

    pub fn weight_for(&self, indicator: &str) -> f64 {
        self.weights
            .get(indicator)
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Weights must be finite and non-negative, or the score bound breaks.
    pub fn validate(&self) -> Result<()> {
        let valid = |w: f64| w.is_finite() && w >= 0.0;

        if !valid(self.default_weight) {
            return Err(HandlewatchError::Config(format!(
                "scoring.default_weight must be a finite non-negative number, got {}",
                self.default_weight
            )));
        }
        if let Some((indicator, weight)) = self.weights.iter().find(|(_, w)| !valid(**w)) {
            return Err(HandlewatchError::Config(format!(
                "scoring weight for {indicator} must be a finite non-negative number, got {weight}"
            )));
        }
        if let Some((indicator, _)) = self
            .weights
            .iter()
            .find(|(_, w)| **w < self.default_weight)
        {
            tracing::warn!(
                indicator = %indicator,
                default_weight = self.default_weight,
                "Configured weight is below the default for unknown indicators"
            );
        }
        Ok(())
    }
}

/// Multiplier applied to an indicator's weight.
///
/// Module-defined statuses carry no known risk and contribute nothing.
pub fn status_multiplier(status: &HandleStatus) -> f64 {
    match status {
        HandleStatus::Available => 2.0,
        HandleStatus::Suspended => 0.5,
        HandleStatus::Exists => 0.2,
        HandleStatus::Other(_) => 0.0,
    }
}

/// Severity tier for a status, or `None` to keep the module's own.
pub fn status_severity(status: &HandleStatus) -> Option<Severity> {
    match status {
        HandleStatus::Available => Some(Severity::High),
        HandleStatus::Suspended => Some(Severity::Medium),
        HandleStatus::Exists => Some(Severity::Info),
        HandleStatus::Other(_) => None,
    }
}

/// Reduces a session's findings to one risk score.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score the session, store the score on it, and return it.
    ///
    /// Also rewrites each finding's severity from its status; the scorer is
    /// the only place severity is decided for known statuses.
    pub fn score(&self, session: &mut ScanSession) -> f64 {
        let mut total = 0.0;

        for finding in &mut session.findings {
            total += self.config.weight_for(&finding.indicator) * status_multiplier(&finding.status);
            if let Some(severity) = status_severity(&finding.status) {
                finding.severity = severity;
            }
        }

        let score = total.clamp(0.0, MAX_SCORE);
        session.risk_score = score;

        tracing::debug!(
            session_id = %session.id,
            findings = session.findings.len(),
            raw = total,
            score,
            "Session scored"
        );

        score
    }

    /// Highest severity among the findings, `Info` when there are none.
    pub fn overall_severity(&self, session: &ScanSession) -> Severity {
        session
            .findings
            .iter()
            .map(|f| f.severity)
            .max()
            .unwrap_or(Severity::Info)
    }
}
