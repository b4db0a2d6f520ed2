// # route53-ddns - Route 53 dynamic DNS updater
//
// Thin integration layer: parses arguments, opens the log file, builds the
// Route 53 provider and the HTTP IP source, and runs one engine pass. All
// DNS decisions live in route53-ddns-core.
//
// ## Configuration
//
// Every option can also come from the environment:
//
// ### Zone
// - `DDNS_PROFILE`: AWS credentials profile
// - `DDNS_ZONE_ID`: Hosted zone ID
// - `DDNS_HOSTNAME`: Hostname to update
// - `DDNS_RECORD_TYPES`: Comma-separated record types (default `A,AAAA`)
// - `DDNS_TTL`: TTL for written records (default 300)
// - `DDNS_APPLY`: Submit changes instead of logging them
//
// ### IP discovery
// - `DDNS_IPV4_URL` / `DDNS_IPV6_URL`: Echo endpoints
// - `DDNS_MAX_RETRIES`, `DDNS_BACKOFF_FACTOR_MS`, `DDNS_TIMEOUT_SECS`
//
// ### Logging
// - `DDNS_LOG_DIR`: Directory for `<hostname>_ddns.log`
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error
// - `DDNS_VERBOSE`: Mirror log lines to stderr
//
// ## Example
//
// ```bash
// route53-ddns --profile home --zone-id Z0123456789ABC \
//     --hostname home.example.com --apply
// ```

use anyhow::{Context, Result};
use clap::Parser;
use route53_ddns_core::config::{
    ApplyMode, DdnsConfig, IpSourceConfig, LogConfig, ProviderConfig, RetryConfig,
};
use route53_ddns_core::{DdnsEngine, RunSummary, telemetry};
use route53_ddns_ip_http::HttpIpSource;
use route53_ddns_provider_route53::Route53Provider;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Exit codes for different termination scenarios
///
/// - 0: Pass completed (some types may have been skipped)
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Pass completed
    Completed = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep a Route 53 A/AAAA record pointed at this host's public address.
#[derive(Parser, Debug)]
#[command(name = "route53-ddns")]
#[command(version, about, long_about = None)]
struct Args {
    /// AWS credentials profile
    #[arg(long, env = "DDNS_PROFILE")]
    profile: String,

    /// Route 53 hosted zone ID
    #[arg(long, env = "DDNS_ZONE_ID")]
    zone_id: String,

    /// Hostname to update, e.g. home.example.com
    #[arg(long, env = "DDNS_HOSTNAME")]
    hostname: String,

    /// Record types to reconcile, in order
    #[arg(
        long = "record-type",
        env = "DDNS_RECORD_TYPES",
        value_delimiter = ',',
        default_values = ["A", "AAAA"]
    )]
    record_types: Vec<String>,

    /// TTL for created or upserted records
    #[arg(long, env = "DDNS_TTL", default_value_t = route53_ddns_core::DEFAULT_TTL)]
    ttl: i64,

    /// Submit changes to Route 53 (default: log only)
    #[arg(long, env = "DDNS_APPLY")]
    apply: bool,

    /// Directory for the log file
    #[arg(long, env = "DDNS_LOG_DIR", default_value = ".")]
    log_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Mirror log lines to stderr
    #[arg(short, long, env = "DDNS_VERBOSE")]
    verbose: bool,

    /// Echo endpoint for A lookups
    #[arg(long, env = "DDNS_IPV4_URL", default_value = route53_ddns_core::config::DEFAULT_IPV4_URL)]
    ipv4_url: String,

    /// Echo endpoint for AAAA lookups
    #[arg(long, env = "DDNS_IPV6_URL", default_value = route53_ddns_core::config::DEFAULT_IPV6_URL)]
    ipv6_url: String,

    /// Retries for 5xx answers from the echo service
    #[arg(long, env = "DDNS_MAX_RETRIES", default_value_t = 5)]
    max_retries: u32,

    /// Backoff factor in milliseconds
    #[arg(long, env = "DDNS_BACKOFF_FACTOR_MS", default_value_t = 1000)]
    backoff_factor_ms: u64,

    /// Per-request timeout for the echo service, in seconds
    #[arg(long, env = "DDNS_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,
}

impl Args {
    /// Build the library configuration
    fn into_config(self) -> DdnsConfig {
        DdnsConfig {
            provider: ProviderConfig {
                profile: self.profile,
                zone_id: self.zone_id,
            },
            hostname: self.hostname,
            record_types: self.record_types,
            ttl: self.ttl,
            ip_source: IpSourceConfig {
                ipv4_url: self.ipv4_url,
                ipv6_url: self.ipv6_url,
                timeout_secs: self.timeout_secs,
                retry: RetryConfig {
                    max_retries: self.max_retries,
                    backoff_factor_ms: self.backoff_factor_ms,
                    ..RetryConfig::default()
                },
            },
            apply_mode: if self.apply {
                ApplyMode::Live
            } else {
                ApplyMode::DryRun
            },
            log: LogConfig {
                directory: self.log_dir,
                level: self.log_level,
                echo_stderr: self.verbose,
            },
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            return if e.use_stderr() {
                DdnsExitCode::ConfigError.into()
            } else {
                DdnsExitCode::Completed.into()
            };
        }
    };

    let config = args.into_config();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Open the log file; lines flush when the handle drops
    let log = match telemetry::init(&config.log, &config.log_file_name()) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to open log file: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let code = match rt.block_on(run(&config)) {
        Ok(summary) => {
            report(&summary);
            DdnsExitCode::Completed
        }
        Err(e) => {
            error!("Startup error: {:#}", e);
            DdnsExitCode::ConfigError
        }
    };

    drop(rt);
    drop(log);
    code.into()
}

/// Build the plugins and run one pass
async fn run(config: &DdnsConfig) -> Result<RunSummary> {
    info!(
        "Starting route53-ddns for {} in zone {}",
        config.record_name(),
        config.provider.zone_id
    );

    let provider = Route53Provider::from_profile(&config.provider.profile, &config.provider.zone_id)
        .await
        .with_context(|| format!("building Route 53 client for profile '{}'", config.provider.profile))?;

    let ip_source =
        HttpIpSource::from_config(&config.ip_source).context("building HTTP IP source")?;

    let engine = DdnsEngine::new(Box::new(ip_source), Box::new(provider), config)
        .context("building engine")?;

    Ok(engine.run().await)
}

/// Log one line per record type
fn report(summary: &RunSummary) {
    for report in &summary.reports {
        info!("{}: {}", report.record_type, report.outcome.label());
    }
    if summary.has_failures() {
        warn!("Some changes were not accepted by Route 53");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 7] = [
        "route53-ddns",
        "--profile",
        "home",
        "--zone-id",
        "Z0123456789ABC",
        "--hostname",
        "home.example.com",
    ];

    #[test]
    fn defaults_produce_dry_run_config() {
        let config = Args::try_parse_from(REQUIRED).unwrap().into_config();

        assert_eq!(config.apply_mode, ApplyMode::DryRun);
        assert_eq!(config.record_types, vec!["A", "AAAA"]);
        assert_eq!(config.ttl, 300);
        assert_eq!(config.ip_source.retry.max_retries, 5);
        assert_eq!(config.ip_source.retry.status_forcelist, vec![500, 502, 503, 504]);
        assert_eq!(config.log.directory, PathBuf::from("."));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn apply_and_record_types_are_parsed() {
        let args = REQUIRED
            .iter()
            .copied()
            .chain(["--apply", "--record-type", "AAAA", "--verbose"]);
        let config = Args::try_parse_from(args).unwrap().into_config();

        assert_eq!(config.apply_mode, ApplyMode::Live);
        assert_eq!(config.record_types, vec!["AAAA"]);
        assert!(config.log.echo_stderr);
    }

    #[test]
    fn missing_required_argument_is_an_error() {
        let result = Args::try_parse_from(["route53-ddns", "--profile", "home"]);
        assert!(result.is_err());
    }

    #[test]
    fn exit_codes_match_convention() {
        assert_eq!(DdnsExitCode::Completed as u8, 0);
        assert_eq!(DdnsExitCode::ConfigError as u8, 1);
        assert_eq!(DdnsExitCode::RuntimeError as u8, 2);
    }
}
