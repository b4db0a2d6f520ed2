// # HTTP IP Source
//
// This crate provides the HTTP transport used to discover the caller's
// public address.
//
// ## Architecture
//
// A plain GET against an IP echo service (ipify by default) returns the
// caller's address as text. `A` lookups use an IPv4-only endpoint, `AAAA`
// lookups an IPv6-capable one. The body is handed back untouched;
// `route53_ddns_core::IpResolver` validates it.
//
// ## Retry Policy
//
// Server errors listed in the retry policy (500, 502, 503, 504 by default)
// are retried with exponential backoff: retry n waits `factor * 2^(n-1)`,
// capped at two minutes. Other statuses and network errors fail at once.

use route53_ddns_core::config::{IpSourceConfig, RetryConfig};
use route53_ddns_core::traits::IpSource;
use route53_ddns_core::types::RecordType;
use route53_ddns_core::{Error, Result};

use std::time::Duration;
use tracing::{debug, warn};

/// Longest wait between two attempts
const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Retry settings for the echo request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base delay; retry n waits `backoff_factor * 2^(n-1)`
    pub backoff_factor: Duration,
    /// Statuses worth another attempt
    pub status_forcelist: Vec<u16>,
}

impl RetryPolicy {
    /// Delay before retry `retry` (1-based)
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(20); // Prevent 2^n from overflowing
        self.backoff_factor
            .saturating_mul(1_u32 << exponent)
            .min(MAX_BACKOFF)
    }

    /// Whether `status` should be retried
    pub fn is_retryable(&self, status: u16) -> bool {
        self.status_forcelist.contains(&status)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_factor: Duration::from_millis(config.backoff_factor_ms),
            status_forcelist: config.status_forcelist.clone(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

/// HTTP-based IP source
pub struct HttpIpSource {
    /// Echo endpoint for A lookups
    ipv4_url: String,

    /// Echo endpoint for AAAA lookups
    ipv6_url: String,

    /// Retry policy for transient server errors
    retry: RetryPolicy,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create an IP source from configuration
    pub fn from_config(config: &IpSourceConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            config.ipv4_url.clone(),
            config.ipv6_url.clone(),
            Duration::from_secs(config.timeout_secs),
            RetryPolicy::from(&config.retry),
        )
    }

    /// Create an IP source
    ///
    /// # Parameters
    ///
    /// - `ipv4_url`: Endpoint answering with the IPv4 address
    /// - `ipv6_url`: Endpoint answering with the IPv6 address (or IPv4 if
    ///   the host has no IPv6 connectivity)
    /// - `timeout`: Per-request timeout
    /// - `retry`: Retry policy
    pub fn new(
        ipv4_url: impl Into<String>,
        ipv6_url: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            ipv4_url: ipv4_url.into(),
            ipv6_url: ipv6_url.into(),
            retry,
            client,
        })
    }

    /// Endpoint used for `record_type`
    pub fn url_for(&self, record_type: RecordType) -> &str {
        match record_type {
            RecordType::A => &self.ipv4_url,
            RecordType::Aaaa => &self.ipv6_url,
        }
    }

    /// GET `url`, retrying statuses in the retry policy
    async fn get_with_retry(&self, url: &str) -> Result<String> {
        let mut retry = 0;
        loop {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| Error::http(format!("Request to {} failed: {}", url, e)))?;

            let status = response.status();
            if status.is_success() {
                return response
                    .text()
                    .await
                    .map_err(|e| Error::http(format!("Failed to read response from {}: {}", url, e)));
            }

            if !self.retry.is_retryable(status.as_u16()) {
                return Err(Error::ip_source(format!("{} answered HTTP {}", url, status)));
            }

            if retry >= self.retry.max_retries {
                return Err(Error::ip_source(format!(
                    "{} answered HTTP {} after {} retries",
                    url, status, retry
                )));
            }

            retry += 1;
            let delay = self.retry.backoff_delay(retry);
            warn!(
                "{} answered HTTP {} (retry {}/{}), retrying in {:.1}s",
                url,
                status,
                retry,
                self.retry.max_retries,
                delay.as_secs_f32()
            );
            tokio::time::sleep(delay).await;
        }
    }
}

impl std::fmt::Debug for HttpIpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIpSource")
            .field("ipv4_url", &self.ipv4_url)
            .field("ipv6_url", &self.ipv6_url)
            .field("retry", &self.retry)
            .finish()
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn fetch(&self, record_type: RecordType) -> Result<String> {
        let url = self.url_for(record_type);
        debug!("Fetching {} address from {}", record_type.family(), url);
        self.get_with_retry(url).await
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
