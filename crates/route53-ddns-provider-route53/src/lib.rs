// # Route 53 DNS Provider
//
// This crate provides an AWS Route 53 provider implementation for the DDNS
// system.
//
// ## Behavior
//
// - One API call per trait method; SDK retries are disabled, no caching
// - Credentials come from a named profile through the AWS SDK's own
//   resolution chain (shared config/credentials files, SSO, ...)
// - Route 53 is a global service: without a region in the profile,
//   `us-east-1` is used
// - NONE requests are rejected; the engine never sends one
//
// ## API Reference
//
// - ListResourceRecordSets: `GET /2013-04-01/hostedzone/{Id}/rrset`
//   with `name` / `type` start parameters
// - ChangeResourceRecordSets: `POST /2013-04-01/hostedzone/{Id}/rrset`

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_route53::Client;
use aws_sdk_route53::config::Region;
use aws_sdk_route53::error::DisplayErrorContext;
use aws_sdk_route53::types::{
    Change, ChangeAction as AwsChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet,
    RrType,
};
use route53_ddns_core::config::ProviderConfig;
use route53_ddns_core::traits::{ChangeStatus, DnsProvider, RecordSet};
use route53_ddns_core::types::{ChangeAction, ChangeRequest, RecordType};
use route53_ddns_core::{Error, Result};
use tracing::debug;

/// Region used when the profile names none
pub const DEFAULT_REGION: &str = "us-east-1";

const PROVIDER_NAME: &str = "route53";

/// AWS Route 53 DNS provider
///
/// Stateless apart from the SDK client. Every failure is returned to the
/// caller as [`Error::Provider`] with the SDK's full error context.
pub struct Route53Provider {
    /// SDK client (credentials and region already resolved)
    client: Client,

    /// Hosted zone ID, e.g. `Z0123456789ABC`
    zone_id: String,
}

impl Route53Provider {
    /// Create a provider from a named credentials profile
    ///
    /// Credentials resolve lazily on the first API call, so an unknown
    /// profile surfaces as a provider error from that call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the profile or zone ID is empty.
    pub async fn from_profile(profile: &str, zone_id: &str) -> Result<Self> {
        let config = ProviderConfig {
            profile: profile.to_string(),
            zone_id: zone_id.to_string(),
        };
        config.validate()?;

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile)
            .load()
            .await;

        if sdk_config.region().is_none() {
            debug!("Profile '{}' sets no region, using {}", profile, DEFAULT_REGION);
        }

        Ok(Self::with_client(
            Client::from_conf(client_config(&sdk_config)),
            zone_id,
        ))
    }

    /// Create a provider around an existing SDK client
    pub fn with_client(client: Client, zone_id: impl Into<String>) -> Self {
        Self {
            client,
            zone_id: zone_id.into(),
        }
    }

    /// Hosted zone this provider operates on
    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }
}

// Custom Debug implementation: the SDK client carries credentials
impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("client", &"<aws-sdk-route53>")
            .field("zone_id", &self.zone_id)
            .finish()
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn list_record_sets(
        &self,
        start_name: &str,
        start_type: RecordType,
    ) -> Result<Option<Vec<RecordSet>>> {
        debug!(
            "ListResourceRecordSets zone={} name={} type={}",
            self.zone_id, start_name, start_type
        );

        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(&self.zone_id)
            .start_record_name(start_name)
            .start_record_type(rr_type(start_type))
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, DisplayErrorContext(&e).to_string()))?;

        Ok(Some(
            output
                .resource_record_sets()
                .iter()
                .map(to_record_set)
                .collect(),
        ))
    }

    async fn change_record_sets(&self, change: &ChangeRequest) -> Result<ChangeStatus> {
        let batch = change_batch(change)?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&self.zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, DisplayErrorContext(&e).to_string()))?;

        let info = output.change_info().ok_or_else(|| {
            Error::provider(PROVIDER_NAME, "ChangeResourceRecordSets returned no ChangeInfo")
        })?;

        Ok(ChangeStatus {
            id: info.id().to_string(),
            status: info.status().as_str().to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Route 53 client configuration derived from the shared SDK config
///
/// SDK retries are disabled: each trait call is exactly one API request.
fn client_config(sdk_config: &SdkConfig) -> aws_sdk_route53::Config {
    let mut builder = aws_sdk_route53::config::Builder::from(sdk_config)
        .retry_config(RetryConfig::disabled());
    if sdk_config.region().is_none() {
        builder = builder.region(Region::new(DEFAULT_REGION));
    }
    builder.build()
}

fn rr_type(record_type: RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
        RecordType::Aaaa => RrType::Aaaa,
    }
}

fn aws_action(action: ChangeAction) -> Option<AwsChangeAction> {
    match action {
        ChangeAction::Create => Some(AwsChangeAction::Create),
        ChangeAction::Upsert => Some(AwsChangeAction::Upsert),
        ChangeAction::Noop => None,
    }
}

/// Provider-neutral view of an SDK record set
fn to_record_set(set: &ResourceRecordSet) -> RecordSet {
    RecordSet {
        name: set.name().to_string(),
        record_type: set.r#type().as_str().to_string(),
        ttl: set.ttl(),
        values: set
            .resource_records()
            .iter()
            .map(|record| record.value().to_string())
            .collect(),
    }
}

/// Single-change batch for `change`
fn change_batch(change: &ChangeRequest) -> Result<ChangeBatch> {
    let action = aws_action(change.action()).ok_or_else(|| {
        Error::invalid_input(format!(
            "NONE change for {} {} cannot be submitted",
            change.record_name(),
            change.record_type()
        ))
    })?;

    let records = change
        .values()
        .iter()
        .map(|value| ResourceRecord::builder().value(value).build())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(build_error)?;

    let record_set = ResourceRecordSet::builder()
        .name(change.record_name())
        .r#type(rr_type(change.record_type()))
        .ttl(change.ttl())
        .set_resource_records(Some(records))
        .build()
        .map_err(build_error)?;

    let change = Change::builder()
        .action(action)
        .resource_record_set(record_set)
        .build()
        .map_err(build_error)?;

    ChangeBatch::builder()
        .changes(change)
        .build()
        .map_err(build_error)
}

fn build_error(e: aws_sdk_route53::error::BuildError) -> Error {
    Error::provider(PROVIDER_NAME, format!("Invalid change batch: {}", e))
}
