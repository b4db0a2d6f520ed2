// # IP Source Trait
//
// Defines the transport used to discover the caller's public address.
//
// ## Implementations
//
// - HTTPS echo services (ipify): `route53-ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use route53_ddns_core::{IpSource, RecordType};
//
// #[tokio::main(flavor = "current_thread")]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     // Raw response body; validation happens in IpResolver
//     let body = source.fetch(RecordType::A).await?;
//     println!("echo service answered: {body}");
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::types::RecordType;

/// Trait for public-IP discovery transports
///
/// An `IpSource` only moves bytes: it performs the request for the given
/// address family and returns the response body. Parsing and family checks
/// belong to [`crate::IpResolver`].
///
/// # Retry Ownership
///
/// Transient server errors from the echo service are retried inside the
/// source, because only its idempotent GET may be repeated. Nothing above
/// the source retries.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the echo service's answer for `record_type`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The raw response body
    /// - `Err(Error)`: Network failure, non-success status, or exhausted retries
    async fn fetch(&self, record_type: RecordType) -> Result<String, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
