//! Static module registry.
//!
//! Modules are built once at startup from configuration; the coordinator
//! receives the finished list and never discovers modules on its own.

use std::sync::Arc;
use std::time::Duration;

use handlewatch_core::error::{HandlewatchError, Result};

use crate::http::{HttpProbeClient, BROWSER_USER_AGENT, DEFAULT_REQUEST_TIMEOUT};
use crate::module::ProbeModule;
use crate::modules::{GithubProbe, InstagramProbe, TwitterProbe};

/// Registry keys of the built-in modules.
pub const MODULE_NAMES: [&str; 3] = ["github", "twitter", "instagram"];

/// Transport settings shared by all built-in modules.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub request_timeout: Duration,
    /// User-Agent for platforms that reject non-browser clients.
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

/// Build the enabled modules in the order given, skipping duplicates.
///
/// Keys are matched case-insensitively against [`MODULE_NAMES`].
pub fn build_modules(
    settings: &ProbeSettings,
    enabled: &[String],
) -> Result<Vec<Arc<dyn ProbeModule>>> {
    if enabled.is_empty() {
        return Err(HandlewatchError::Config(
            "no probe modules enabled".to_string(),
        ));
    }

    let http = HttpProbeClient::new(settings.request_timeout)
        .map_err(|e| HandlewatchError::Config(e.to_string()))?;

    let mut seen = Vec::new();
    let mut modules: Vec<Arc<dyn ProbeModule>> = Vec::new();

    for raw in enabled {
        let key = raw.trim().to_lowercase();
        if seen.contains(&key) {
            continue;
        }

        let module: Arc<dyn ProbeModule> = match key.as_str() {
            "github" => Arc::new(GithubProbe::new(http.clone())),
            "twitter" => Arc::new(
                TwitterProbe::new(http.clone()).with_user_agent(settings.user_agent.as_str()),
            ),
            "instagram" => Arc::new(
                InstagramProbe::new(http.clone()).with_user_agent(settings.user_agent.as_str()),
            ),
            _ => return Err(HandlewatchError::UnknownModule(raw.clone())),
        };

        tracing::debug!(module = module.name(), "Probe module registered");
        modules.push(module);
        seen.push(key);
    }

    Ok(modules)
}
