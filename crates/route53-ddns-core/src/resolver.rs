//! IP Resolver
//!
//! Turns an [`IpSource`] response into an observed address. Every failure
//! (transport error, non-IP body, wrong address family) is logged and
//! reduced to `None`; nothing propagates to the caller.

use std::net::IpAddr;
use tracing::{debug, error};

use crate::traits::IpSource;
use crate::types::RecordType;

/// Longest response excerpt copied into a log line
const MAX_LOGGED_BODY: usize = 64;

/// Resolves the caller's public address for a record type
pub struct IpResolver {
    source: Box<dyn IpSource>,
}

impl IpResolver {
    pub fn new(source: Box<dyn IpSource>) -> Self {
        Self { source }
    }

    /// Resolve the observed address for `record_type`
    ///
    /// # Returns
    ///
    /// - `Some(ip)`: The echo service answered with an address of the
    ///   record type's family
    /// - `None`: No usable address (already logged)
    pub async fn resolve(&self, record_type: RecordType) -> Option<IpAddr> {
        let body = match self.source.fetch(record_type).await {
            Ok(body) => body,
            Err(e) => {
                error!(
                    "resolve({}): {} lookup via {} failed: {}",
                    record_type,
                    record_type.family(),
                    self.source.source_name(),
                    e
                );
                return None;
            }
        };

        let observed = parse_observed(record_type, &body)?;
        debug!("resolve({}): observed {}", record_type, observed);
        Some(observed)
    }
}

/// Parse an echo response body into an address of `record_type`'s family
fn parse_observed(record_type: RecordType, body: &str) -> Option<IpAddr> {
    let text = body.trim();

    let ip = match text.parse::<IpAddr>() {
        Ok(ip) => ip,
        Err(_) => {
            error!(
                "resolve({}): No IP found in response body {:?}",
                record_type,
                truncate_for_log(text)
            );
            return None;
        }
    };

    if !record_type.accepts(&ip) {
        error!(
            "resolve({}): expected an {} address, got {}",
            record_type,
            record_type.family(),
            ip
        );
        return None;
    }

    Some(ip)
}

fn truncate_for_log(text: &str) -> String {
    match text.char_indices().nth(MAX_LOGGED_BODY) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
