//! Per-scan context handed to every probe invocation.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Longest deadline a context will carry.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// The instant `timeout` from now, saturating at roughly thirty years out.
pub fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout.min(FAR_FUTURE)).unwrap_or(now)
}

/// Cancellation signal and deadline shared by all modules of one scan.
#[derive(Debug, Clone)]
pub struct ProbeContext {
    cancel: CancellationToken,
    deadline: Instant,
}

impl ProbeContext {
    pub fn new(cancel: CancellationToken, deadline: Instant) -> Self {
        Self { cancel, deadline }
    }

    /// A standalone context with a fresh token, expiring after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(CancellationToken::new(), deadline_after(timeout))
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_saturates_at_zero() {
        let ctx = ProbeContext::new(CancellationToken::new(), Instant::now());
        assert_eq!(ctx.remaining(), Duration::ZERO);
    }

    #[test]
    fn huge_timeout_saturates() {
        let ctx = ProbeContext::with_timeout(Duration::MAX);
        assert!(ctx.remaining() > Duration::from_secs(86_400 * 365));
        assert!(ctx.remaining() <= FAR_FUTURE);
    }

    #[test]
    fn deadline_after_keeps_ordinary_timeouts() {
        let before = Instant::now();
        let deadline = deadline_after(Duration::from_secs(5));
        assert!(deadline >= before + Duration::from_secs(5));
        assert!(deadline <= Instant::now() + Duration::from_secs(5));
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let ctx = ProbeContext::with_timeout(Duration::from_secs(5));
        let clone = ctx.clone();
        assert!(!clone.is_cancelled());
        ctx.cancellation().cancel();
        assert!(clone.is_cancelled());
    }
}
