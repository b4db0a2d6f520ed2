//! Configuration types for the DDNS system
//!
//! This module defines all configuration structures used throughout the crate.
//! The binary fills them from command-line arguments and `DDNS_*`
//! environment variables; library users can build them directly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::DEFAULT_TTL;

/// Default IPv4-only echo endpoint
pub const DEFAULT_IPV4_URL: &str = "https://api.ipify.org";

/// Default IPv6-capable echo endpoint
pub const DEFAULT_IPV6_URL: &str = "https://api64.ipify.org";

/// Main DDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Hostname to keep up to date (FQDN, trailing dot optional)
    pub hostname: String,

    /// Record types to reconcile, in order
    #[serde(default = "default_record_types")]
    pub record_types: Vec<String>,

    /// TTL written on created or upserted record sets
    #[serde(default = "default_ttl")]
    pub ttl: i64,

    /// Public-IP discovery settings
    #[serde(default)]
    pub ip_source: IpSourceConfig,

    /// Whether computed changes are submitted
    #[serde(default)]
    pub apply_mode: ApplyMode,

    /// Log sink settings
    #[serde(default)]
    pub log: LogConfig,
}

impl DdnsConfig {
    /// Create a configuration with defaults for everything but the zone
    pub fn new(
        profile: impl Into<String>,
        zone_id: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            provider: ProviderConfig {
                profile: profile.into(),
                zone_id: zone_id.into(),
            },
            hostname: hostname.into(),
            record_types: default_record_types(),
            ttl: default_ttl(),
            ip_source: IpSourceConfig::default(),
            apply_mode: ApplyMode::default(),
            log: LogConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        validate_hostname(&self.hostname)?;

        if self.record_types.is_empty() {
            return Err(crate::Error::config("At least one record type is required"));
        }

        if !(1..=172_800).contains(&self.ttl) {
            return Err(crate::Error::config(format!(
                "TTL must be between 1 and 172800 seconds. Got: {}",
                self.ttl
            )));
        }

        self.ip_source.validate()?;
        self.log.validate()?;

        Ok(())
    }

    /// Record name as written to the zone: the hostname with one trailing dot
    pub fn record_name(&self) -> String {
        fqdn(&self.hostname)
    }

    /// Name of the per-hostname log file
    pub fn log_file_name(&self) -> String {
        format!("{}_ddns.log", self.hostname.trim_end_matches('.'))
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Named credentials profile for the provider SDK
    pub profile: String,
    /// Hosted zone identifier
    pub zone_id: String,
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.profile.trim().is_empty() {
            return Err(crate::Error::config("Provider profile cannot be empty"));
        }
        if self.zone_id.trim().is_empty() {
            return Err(crate::Error::config("Hosted zone ID cannot be empty"));
        }
        if self.zone_id.contains(char::is_whitespace) {
            return Err(crate::Error::config(format!(
                "Hosted zone ID contains whitespace: {:?}",
                self.zone_id
            )));
        }
        Ok(())
    }
}

/// Public-IP discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpSourceConfig {
    /// Echo endpoint used for A records
    #[serde(default = "default_ipv4_url")]
    pub ipv4_url: String,

    /// Echo endpoint used for AAAA records
    #[serde(default = "default_ipv6_url")]
    pub ipv6_url: String,

    /// Per-request timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry policy for transient server errors
    #[serde(default)]
    pub retry: RetryConfig,
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        for url in [&self.ipv4_url, &self.ipv6_url] {
            if url.is_empty() {
                return Err(crate::Error::config("IP echo URL cannot be empty"));
            }
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "IP echo URL must use HTTP or HTTPS scheme. Got: {}",
                    url
                )));
            }
        }

        if !(1..=300).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "IP source timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }

        self.retry.validate()
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        Self {
            ipv4_url: default_ipv4_url(),
            ipv6_url: default_ipv6_url(),
            timeout_secs: default_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy for the IP echo transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff factor (in milliseconds); retry n waits factor * 2^(n-1)
    #[serde(default = "default_backoff_factor_ms")]
    pub backoff_factor_ms: u64,

    /// HTTP status codes that trigger a retry
    #[serde(default = "default_status_forcelist")]
    pub status_forcelist: Vec<u16>,
}

impl RetryConfig {
    /// Validate the retry policy
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_retries > 10 {
            return Err(crate::Error::config(format!(
                "Max retries must be between 0 and 10. Got: {}",
                self.max_retries
            )));
        }
        if self.backoff_factor_ms > 60_000 {
            return Err(crate::Error::config(format!(
                "Backoff factor must be at most 60000 ms. Got: {}",
                self.backoff_factor_ms
            )));
        }
        if let Some(code) = self
            .status_forcelist
            .iter()
            .find(|code| !(100..=599).contains(*code))
        {
            return Err(crate::Error::config(format!(
                "Retry status {} is not an HTTP status code",
                code
            )));
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_factor_ms: default_backoff_factor_ms(),
            status_forcelist: default_status_forcelist(),
        }
    }
}

/// Whether computed changes reach the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Log the change without submitting it
    #[default]
    DryRun,
    /// Submit the change to the provider
    Live,
}

/// Log sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory holding `<hostname>_ddns.log`
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Maximum level written (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Mirror log lines to stderr
    #[serde(default)]
    pub echo_stderr: bool,
}

impl LogConfig {
    /// Validate the log configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(format!(
                    "Log level '{}' is not valid. \
                    Valid levels: trace, debug, info, warn, error",
                    self.level
                )));
            }
        }

        if self.directory.as_os_str().is_empty() {
            return Err(crate::Error::config("Log directory cannot be empty"));
        }

        Ok(())
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            level: default_log_level(),
            echo_stderr: false,
        }
    }
}

/// Append exactly one trailing dot to `hostname`
pub fn fqdn(hostname: &str) -> String {
    format!("{}.", hostname.trim_end_matches('.'))
}

/// Validate that a string is a usable hostname
///
/// Basic RFC 1035 label rules, plus a leading `*` wildcard label and an
/// optional trailing dot.
pub fn validate_hostname(hostname: &str) -> Result<(), crate::Error> {
    let domain = hostname.strip_suffix('.').unwrap_or(hostname);

    if domain.is_empty() {
        return Err(crate::Error::config("Hostname cannot be empty"));
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "Hostname too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err(crate::Error::config(format!(
            "Hostname must be fully qualified (e.g. host.example.com). Got: {}",
            domain
        )));
    }

    for (index, label) in labels.iter().enumerate() {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Hostname has empty label: '{}'",
                domain
            )));
        }

        if *label == "*" {
            if index == 0 {
                continue;
            }
            return Err(crate::Error::config(format!(
                "Wildcard label must be the leftmost label. Got: {}",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Hostname label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(crate::Error::config(format!(
                "Hostname label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Hostname label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn default_record_types() -> Vec<String> {
    vec!["A".to_string(), "AAAA".to_string()]
}

fn default_ttl() -> i64 {
    DEFAULT_TTL
}

fn default_ipv4_url() -> String {
    DEFAULT_IPV4_URL.to_string()
}

fn default_ipv6_url() -> String {
    DEFAULT_IPV6_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    5
}

fn default_backoff_factor_ms() -> u64 {
    1000
}

fn default_status_forcelist() -> Vec<u16> {
    vec![500, 502, 503, 504]
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "info".to_string()
}
