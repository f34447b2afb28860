//! Shared HTTP plumbing for platform probes.
//!
//! Every module performs exactly one GET against a profile URL and maps the
//! response code to a handle status. The request timeout is capped by the
//! time remaining until the scan deadline, and the request is raced against
//! the scan's cancellation token.

use std::time::Duration;

use handlewatch_core::HandleStatus;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};

use crate::context::ProbeContext;
use crate::error::{ProbeError, Result};

/// User-Agent sent to platforms that reject obvious non-browser clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper around a pooled `reqwest::Client`. Clone is cheap.
#[derive(Debug, Clone)]
pub struct HttpProbeClient {
    client: Client,
    request_timeout: Duration,
}

impl HttpProbeClient {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ProbeError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            request_timeout,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// GET `url` and return the response status.
    pub async fn fetch_status(
        &self,
        url: &str,
        user_agent: Option<&str>,
        ctx: &ProbeContext,
    ) -> Result<StatusCode> {
        if ctx.is_cancelled() {
            return Err(ProbeError::Cancelled);
        }

        let timeout = self.request_timeout.min(ctx.remaining());
        if timeout.is_zero() {
            return Err(ProbeError::DeadlineElapsed);
        }

        let mut request = self.client.get(url).timeout(timeout);
        if let Some(ua) = user_agent {
            request = request.header(USER_AGENT, ua);
        }

        tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => Err(ProbeError::Cancelled),
            response = request.send() => {
                let response = response?;
                tracing::debug!(url = %url, status = response.status().as_u16(), "Probe response");
                Ok(response.status())
            }
        }
    }
}

/// Map a profile-page response code to a status.
///
/// `None` means the platform's answer is ambiguous (rate limiting, login
/// walls, server errors) and the module should report nothing.
pub fn classify_status(status: StatusCode) -> Option<HandleStatus> {
    match status {
        StatusCode::OK => Some(HandleStatus::Exists),
        StatusCode::NOT_FOUND => Some(HandleStatus::Available),
        _ => None,
    }
}

/// Reject targets that cannot be a bare handle in a profile URL path.
pub fn validate_handle(target: &str) -> Result<&str> {
    let handle = target.trim();
    if handle.is_empty() {
        return Err(ProbeError::InvalidTarget {
            target: target.to_string(),
            reason: "handle is empty".to_string(),
        });
    }
    if let Some(c) = handle
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%' | '@' | ':'))
    {
        return Err(ProbeError::InvalidTarget {
            target: target.to_string(),
            reason: format!("unexpected character {c:?}"),
        });
    }
    Ok(handle)
}
