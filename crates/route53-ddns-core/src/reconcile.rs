//! Reconciler
//!
//! Computes the minimal change that makes the published record set contain
//! the observed address(es):
//!
//! | existing | observed            | action                         |
//! |----------|---------------------|--------------------------------|
//! | any      | empty               | NONE                           |
//! | empty    | non-empty           | CREATE observed                |
//! | ⊇ observed | non-empty         | NONE                           |
//! | other    | non-empty           | UPSERT existing ∪ observed     |
//!
//! UPSERT replaces the whole value list of a record set, so it always
//! carries the published values followed by the new ones.

use std::net::IpAddr;
use tracing::{info, warn};

use crate::types::{AddressSet, ChangeAction, ChangeRequest, RecordType};

/// Decides what change a record type needs
#[derive(Debug, Clone)]
pub struct Reconciler {
    record_name: String,
    ttl: i64,
}

impl Reconciler {
    /// Create a reconciler for `record_name` (FQDN with trailing dot)
    pub fn new(record_name: impl Into<String>, ttl: i64) -> Self {
        Self {
            record_name: record_name.into(),
            ttl,
        }
    }

    pub fn record_name(&self) -> &str {
        &self.record_name
    }

    /// Compute the change for `record_type`
    pub fn reconcile(
        &self,
        record_type: RecordType,
        existing: &AddressSet,
        observed: &[IpAddr],
    ) -> ChangeRequest {
        if observed.is_empty() {
            warn!(
                "reconcile({}): no observed address for {}, leaving zone untouched",
                record_type, self.record_name
            );
            return ChangeRequest::noop(&self.record_name, record_type, self.ttl);
        }

        let mut fresh: Vec<IpAddr> = Vec::with_capacity(observed.len());
        for ip in observed {
            if !existing.contains(ip) && !fresh.contains(ip) {
                fresh.push(*ip);
            }
        }
        let fresh: Vec<String> = fresh.iter().map(IpAddr::to_string).collect();

        if existing.is_empty() {
            return ChangeRequest::new(
                ChangeAction::Create,
                &self.record_name,
                record_type,
                self.ttl,
                fresh,
            );
        }

        if fresh.is_empty() {
            info!(
                "reconcile({}): {}: No new records found.",
                record_type, self.record_name
            );
            return ChangeRequest::noop(&self.record_name, record_type, self.ttl);
        }

        info!(
            "reconcile({}): {}: New records found: {:?}",
            record_type, self.record_name, fresh
        );

        let values = existing.values().iter().cloned().chain(fresh).collect();
        ChangeRequest::new(
            ChangeAction::Upsert,
            &self.record_name,
            record_type,
            self.ttl,
            values,
        )
    }
}
