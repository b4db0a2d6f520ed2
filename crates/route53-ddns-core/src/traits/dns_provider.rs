// # DNS Provider Trait
//
// Defines the interface the engine needs from a hosted-zone API.
//
// ## Implementations
//
// - AWS Route 53: `route53-ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use route53_ddns_core::{DnsProvider, RecordType};
//
// #[tokio::main(flavor = "current_thread")]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     // Record sets starting at the given name and type
//     let sets = provider
//         .list_record_sets("home.example.com.", RecordType::A)
//         .await?;
//     println!("{sets:?}");
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::Serialize;

use crate::types::{ChangeRequest, RecordType};

/// A record set as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSet {
    /// Fully-qualified record name, as the provider spells it
    pub name: String,
    /// Record type text ("A", "AAAA", "CNAME", ...)
    pub record_type: String,
    /// Time-to-live, if the record set carries one
    pub ttl: Option<i64>,
    /// Record values
    pub values: Vec<String>,
}

/// Provider acknowledgement of a submitted change batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeStatus {
    /// Provider change identifier
    pub id: String,
    /// Provider status text (e.g. "PENDING", "INSYNC")
    pub status: String,
}

/// Trait for DNS provider implementations
///
/// The engine reads one record set and, in live mode, submits one change
/// per record type. Providers translate those two calls to their API.
///
/// # Constraints
///
/// - One API call per method invocation; no retry or backoff
/// - No decision about whether a change is needed (owned by `Reconciler`)
/// - Credentials are resolved by the provider's own SDK configuration
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List record sets starting at `start_name` / `start_type`
    ///
    /// The listing is ordered the provider's way; if no exact match exists
    /// the first entry may belong to a different name or type.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(sets))`: The provider returned a record-set container
    /// - `Ok(None)`: The response carried no record-set container at all
    /// - `Err(Error)`: The request failed
    async fn list_record_sets(
        &self,
        start_name: &str,
        start_type: RecordType,
    ) -> Result<Option<Vec<RecordSet>>, crate::Error>;

    /// Submit `change` as a single-change batch
    ///
    /// Callers never pass a NONE request; implementations reject one with
    /// [`crate::Error::InvalidInput`].
    async fn change_record_sets(&self, change: &ChangeRequest)
    -> Result<ChangeStatus, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
