//! Twitter/X profile probe.

use async_trait::async_trait;
use handlewatch_core::{Finding, HandleStatus};

use crate::context::ProbeContext;
use crate::error::Result;
use crate::http::{classify_status, validate_handle, HttpProbeClient, BROWSER_USER_AGENT};
use crate::module::ProbeModule;

const NAME: &str = "Twitter";
const INDICATOR: &str = "twitter_profile";
const DEFAULT_BASE_URL: &str = "https://twitter.com";

/// Checks for a Twitter/X profile. Twitter blocks bare clients, so the
/// request carries a browser User-Agent.
pub struct TwitterProbe {
    http: HttpProbeClient,
    base_url: String,
    user_agent: String,
}

impl TwitterProbe {
    pub fn new(http: HttpProbeClient) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn profile_url(&self, handle: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), handle)
    }
}

#[async_trait]
impl ProbeModule for TwitterProbe {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Checks for Twitter/X profiles"
    }

    async fn check(&self, target: &str, ctx: &ProbeContext) -> Result<Vec<Finding>> {
        let handle = validate_handle(target)?;
        let url = self.profile_url(handle);
        let code = self
            .http
            .fetch_status(&url, Some(self.user_agent.as_str()), ctx)
            .await?;

        // A 404 covers both never-registered and suspended accounts; Twitter
        // does not distinguish them without an authenticated API call.
        let finding = match classify_status(code) {
            Some(HandleStatus::Exists) => Finding::new(
                NAME,
                INDICATOR,
                handle,
                HandleStatus::Exists,
                format!("Twitter profile found: {url}"),
            ),
            Some(HandleStatus::Available) => Finding::new(
                NAME,
                INDICATOR,
                handle,
                HandleStatus::Available,
                format!("Twitter username '{handle}' is available or suspended"),
            ),
            _ => {
                tracing::debug!(module = NAME, handle = %handle, status = code.as_u16(), "Ambiguous response, no finding");
                return Ok(Vec::new());
            }
        };

        Ok(vec![finding
            .with_metadata("url", url)
            .with_metadata("http_status", code.as_u16())])
    }
}
