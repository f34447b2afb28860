//! GitHub profile probe.

use async_trait::async_trait;
use handlewatch_core::{Finding, HandleStatus};

use crate::context::ProbeContext;
use crate::error::Result;
use crate::http::{classify_status, validate_handle, HttpProbeClient};
use crate::module::ProbeModule;

const NAME: &str = "GitHub";
const INDICATOR: &str = "github_profile";
const DEFAULT_BASE_URL: &str = "https://github.com";

/// Checks whether `github.com/{handle}` resolves to a user or organisation.
pub struct GithubProbe {
    http: HttpProbeClient,
    base_url: String,
}

impl GithubProbe {
    pub fn new(http: HttpProbeClient) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the probe at a different host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn profile_url(&self, handle: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), handle)
    }
}

#[async_trait]
impl ProbeModule for GithubProbe {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Checks for GitHub profiles and repository availability"
    }

    async fn check(&self, target: &str, ctx: &ProbeContext) -> Result<Vec<Finding>> {
        let handle = validate_handle(target)?;
        let url = self.profile_url(handle);
        let code = self.http.fetch_status(&url, None, ctx).await?;

        let finding = match classify_status(code) {
            Some(HandleStatus::Exists) => Finding::new(
                NAME,
                INDICATOR,
                handle,
                HandleStatus::Exists,
                format!("GitHub profile found: {url}"),
            ),
            Some(HandleStatus::Available) => Finding::new(
                NAME,
                INDICATOR,
                handle,
                HandleStatus::Available,
                format!("GitHub username '{handle}' is available for registration"),
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

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use handlewatch_core::Severity;

    use super::*;
    use crate::error::ProbeError;
    use crate::test_server::{self, Reply};

    fn probe(base: &str) -> GithubProbe {
        GithubProbe::new(HttpProbeClient::new(Duration::from_secs(5)).unwrap()).with_base_url(base)
    }

    #[tokio::test]
    async fn existing_profile() {
        let (base, mut requests) = test_server::spawn_recording(Reply::Status(200)).await;
        let ctx = ProbeContext::with_timeout(Duration::from_secs(5));

        let findings = probe(&base).check("octocat", &ctx).await.unwrap();
        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.module_name, "GitHub");
        assert_eq!(f.indicator, "github_profile");
        assert_eq!(f.value, "octocat");
        assert_eq!(f.status, HandleStatus::Exists);
        assert_eq!(f.severity, Severity::Info);
        assert_eq!(f.metadata["http_status"], 200);

        let head = requests.recv().await.unwrap();
        assert!(head.starts_with("GET /octocat HTTP/1.1"));
    }

    #[tokio::test]
    async fn unclaimed_handle() {
        let base = test_server::spawn(Reply::Status(404)).await;
        let ctx = ProbeContext::with_timeout(Duration::from_secs(5));

        let findings = probe(&base).check("nobody-here", &ctx).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].status, HandleStatus::Available);
        assert_eq!(findings[0].severity, Severity::Low);
        assert!(findings[0].description.contains("available for registration"));
    }

    #[tokio::test]
    async fn ambiguous_response_yields_nothing() {
        let base = test_server::spawn(Reply::Status(429)).await;
        let ctx = ProbeContext::with_timeout(Duration::from_secs(5));

        let findings = probe(&base).check("octocat", &ctx).await.unwrap();
        assert!(findings.is_empty());
    }

    #[tokio::test]
    async fn malformed_target_is_an_error() {
        let ctx = ProbeContext::with_timeout(Duration::from_secs(5));
        let err = probe("http://127.0.0.1:9")
            .check("a/b", &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::InvalidTarget { .. }));
    }

    #[tokio::test]
    async fn connection_failure_is_an_error() {
        // Nothing listens on the discard port.
        let ctx = ProbeContext::with_timeout(Duration::from_secs(5));
        let err = probe("http://127.0.0.1:9")
            .check("octocat", &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Transport(_)));
    }
}
