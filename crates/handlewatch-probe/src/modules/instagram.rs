//! Instagram profile probe.

use async_trait::async_trait;
use handlewatch_core::{Finding, HandleStatus};

use crate::context::ProbeContext;
use crate::error::Result;
use crate::http::{classify_status, validate_handle, HttpProbeClient, BROWSER_USER_AGENT};
use crate::module::ProbeModule;

const NAME: &str = "Instagram";
const INDICATOR: &str = "instagram_profile";
const DEFAULT_BASE_URL: &str = "https://www.instagram.com";

pub struct InstagramProbe {
    http: HttpProbeClient,
    base_url: String,
    user_agent: String,
}

impl InstagramProbe {
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

    // Instagram redirects the slash-less form, which would turn every
    // answer into an ambiguous 301.
    fn profile_url(&self, handle: &str) -> String {
        format!("{}/{}/", self.base_url.trim_end_matches('/'), handle)
    }
}

#[async_trait]
impl ProbeModule for InstagramProbe {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Checks for Instagram profiles"
    }

    async fn check(&self, target: &str, ctx: &ProbeContext) -> Result<Vec<Finding>> {
        let handle = validate_handle(target)?;
        let url = self.profile_url(handle);
        let code = self
            .http
            .fetch_status(&url, Some(self.user_agent.as_str()), ctx)
            .await?;

        let finding = match classify_status(code) {
            Some(HandleStatus::Exists) => Finding::new(
                NAME,
                INDICATOR,
                handle,
                HandleStatus::Exists,
                format!("Instagram profile found: {url}"),
            ),
            Some(HandleStatus::Available) => Finding::new(
                NAME,
                INDICATOR,
                handle,
                HandleStatus::Available,
                format!("Instagram username '{handle}' is available"),
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
