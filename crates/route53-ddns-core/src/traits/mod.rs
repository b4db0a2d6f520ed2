//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Fetch the caller's public address from an echo service
//! - [`DnsProvider`]: Read and change record sets in a hosted zone

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::{ChangeStatus, DnsProvider, RecordSet};
pub use ip_source::IpSource;
