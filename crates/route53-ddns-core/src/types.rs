//! Record types, address sets and change requests
//!
//! These values are built and dropped within a single reconciliation pass.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::Error;

/// TTL applied to every record set this system writes
pub const DEFAULT_TTL: i64 = 300;

/// DNS record type managed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 address record
    #[serde(rename = "A")]
    A,
    /// IPv6 address record
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Every supported record type, in the order a run handles them
    pub const ALL: [RecordType; 2] = [RecordType::A, RecordType::Aaaa];

    /// Wire name of the record type ("A" or "AAAA")
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }

    /// Human-readable address family, used in log messages
    pub fn family(&self) -> &'static str {
        match self {
            RecordType::A => "IPv4",
            RecordType::Aaaa => "IPv6",
        }
    }

    /// Whether `ip` belongs to this record type's address family
    pub fn accepts(&self, ip: &IpAddr) -> bool {
        match self {
            RecordType::A => ip.is_ipv4(),
            RecordType::Aaaa => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            _ => Err(Error::invalid_input(format!(
                "record type {s:?} not in [\"A\", \"AAAA\"]"
            ))),
        }
    }
}

/// Values currently published for one (name, type) record set
///
/// Order is preserved as the provider returned it. Membership checks compare
/// IP literals by parsed value, so `2001:DB8::1` and `2001:db8::1` are the
/// same address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AddressSet(Vec<String>);

impl AddressSet {
    /// Wrap the values of a record set
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// An empty set (the zone has no record of this type)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Published values, in provider order
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Whether `ip` is already published
    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.iter().any(|value| match value.trim().parse::<IpAddr>() {
            Ok(published) => published == *ip,
            Err(_) => value == &ip.to_string(),
        })
    }
}

impl FromIterator<String> for AddressSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Action carried by a [`ChangeRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeAction {
    /// Publish a record set where none exists
    #[serde(rename = "CREATE")]
    Create,
    /// Replace the full value list of an existing record set
    #[serde(rename = "UPSERT")]
    Upsert,
    /// Nothing to change
    #[serde(rename = "NONE")]
    Noop,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Create => "CREATE",
            ChangeAction::Upsert => "UPSERT",
            ChangeAction::Noop => "NONE",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed change for one record set
///
/// Immutable once built. The constructor keeps the invariant that
/// `values` is non-empty exactly when the action is CREATE or UPSERT:
/// a mutating action with no values collapses to NONE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRequest {
    action: ChangeAction,
    record_name: String,
    record_type: RecordType,
    ttl: i64,
    values: Vec<String>,
}

impl ChangeRequest {
    /// Build a change request
    pub fn new(
        action: ChangeAction,
        record_name: impl Into<String>,
        record_type: RecordType,
        ttl: i64,
        values: Vec<String>,
    ) -> Self {
        let (action, values) = if action == ChangeAction::Noop || values.is_empty() {
            (ChangeAction::Noop, Vec::new())
        } else {
            (action, values)
        };

        Self {
            action,
            record_name: record_name.into(),
            record_type,
            ttl,
            values,
        }
    }

    /// A request that changes nothing
    pub fn noop(record_name: impl Into<String>, record_type: RecordType, ttl: i64) -> Self {
        Self::new(ChangeAction::Noop, record_name, record_type, ttl, Vec::new())
    }

    pub fn action(&self) -> ChangeAction {
        self.action
    }

    pub fn record_name(&self) -> &str {
        &self.record_name
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Whether this request would modify the zone
    pub fn is_change(&self) -> bool {
        self.action != ChangeAction::Noop
    }
}
