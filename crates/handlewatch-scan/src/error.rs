//! Error types for the handlewatch-scan crate.

use std::time::Duration;

use handlewatch_core::ScanSession;
use thiserror::Error;

/// Why a scan did not complete cleanly.
///
/// Runtime variants carry the session collected so far: a failed scan still
/// yields a usable, possibly empty, result.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("max_concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("Scan target is empty")]
    EmptyTarget,

    #[error("Scan of {target} exceeded its {deadline:?} deadline with {pending} module(s) outstanding")]
    DeadlineExceeded {
        target: String,
        deadline: Duration,
        pending: usize,
        session: Box<ScanSession>,
    },

    #[error("Scan of {target} produced no findings; {failed} module(s) failed")]
    NoFindings {
        target: String,
        failed: usize,
        session: Box<ScanSession>,
    },
}

impl ScanError {
    /// The partial session, if the scan got far enough to open one.
    pub fn session(&self) -> Option<&ScanSession> {
        match self {
            Self::DeadlineExceeded { session, .. } | Self::NoFindings { session, .. } => {
                Some(session.as_ref())
            }
            Self::InvalidConcurrency | Self::EmptyTarget => None,
        }
    }

    pub fn into_session(self) -> Option<ScanSession> {
        match self {
            Self::DeadlineExceeded { session, .. } | Self::NoFindings { session, .. } => {
                Some(*session)
            }
            Self::InvalidConcurrency | Self::EmptyTarget => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
