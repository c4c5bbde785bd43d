/// Probe module for the pulse-check batch system
///
/// A probe is a single HEAD request against one URL. The result is kept as
/// an explicit `ProbeOutcome` and reduced to an up/down flag by `is_up`.
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;

/// Why a probe produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    Timeout,
    Connect,
    InvalidUrl,
    Other(String),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeFailure::Timeout => write!(f, "request timed out"),
            ProbeFailure::Connect => write!(f, "connection failed"),
            ProbeFailure::InvalidUrl => write!(f, "invalid url"),
            ProbeFailure::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<&reqwest::Error> for ProbeFailure {
    fn from(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeFailure::Timeout
        } else if e.is_connect() {
            ProbeFailure::Connect
        } else if e.is_builder() {
            ProbeFailure::InvalidUrl
        } else {
            ProbeFailure::Other(e.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Response(StatusCode),
    Failure(ProbeFailure),
}

impl ProbeOutcome {
    /// 2xx and 3xx count as reachable, everything else as down.
    pub fn is_up(&self) -> bool {
        match self {
            ProbeOutcome::Response(status) => status.is_success() || status.is_redirection(),
            ProbeOutcome::Failure(_) => false,
        }
    }
}

impl From<Result<StatusCode, ProbeFailure>> for ProbeOutcome {
    fn from(result: Result<StatusCode, ProbeFailure>) -> Self {
        match result {
            Ok(status) => ProbeOutcome::Response(status),
            Err(reason) => ProbeOutcome::Failure(reason),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prober: Send + Sync {
    /// Checks a single URL. Never fails; transport errors become `Failure`.
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// HEAD prober backed by a reqwest client.
///
/// Redirects are not followed so that a 3xx answer is judged on its own.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .pool_max_idle_per_host(0)
            .build()
            .context("Failed to build reqwest client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let result = self
            .client
            .head(url)
            .send()
            .await
            .map(|response| response.status())
            .map_err(|e| {
                tracing::debug!("probe of {} failed: {}", url, e);
                ProbeFailure::from(&e)
            });
        result.into()
    }
}
