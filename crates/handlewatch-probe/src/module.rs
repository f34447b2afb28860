//! The probe module contract.

use async_trait::async_trait;
use handlewatch_core::Finding;

use crate::context::ProbeContext;
use crate::error::Result;

/// A platform-specific existence check.
///
/// Implementations must be stateless with respect to a scan: the coordinator
/// calls `check` from several tasks at once, for the same or different targets.
#[async_trait]
pub trait ProbeModule: Send + Sync {
    /// Stable unique name, used as `module_name` on every finding and as a log tag.
    fn name(&self) -> &str;

    /// Human-readable description of what the module checks.
    fn description(&self) -> &str;

    /// Probe `target` on the module's platform.
    ///
    /// Returns an empty vector when the platform answers with something the
    /// module cannot classify. Returns an error only when the fetch itself
    /// fails or the target is malformed. Must return promptly once
    /// `ctx.cancellation()` fires.
    async fn check(&self, target: &str, ctx: &ProbeContext) -> Result<Vec<Finding>>;
}
