//! Zone Reader
//!
//! Reads the address values currently published for the managed hostname.
//! Only the first record set of the provider's listing is inspected; when
//! it belongs to another name or type the zone has no record of the
//! requested type.

use std::sync::Arc;
use tracing::{debug, error};

use crate::traits::{DnsProvider, RecordSet};
use crate::types::{AddressSet, RecordType};

/// Reads published A/AAAA values for one hostname
pub struct ZoneReader {
    provider: Arc<dyn DnsProvider>,
    record_name: String,
}

impl ZoneReader {
    /// Create a reader for `record_name` (FQDN with trailing dot)
    pub fn new(provider: Arc<dyn DnsProvider>, record_name: impl Into<String>) -> Self {
        Self {
            provider,
            record_name: record_name.into(),
        }
    }

    /// List the values published for `record_type`
    ///
    /// # Returns
    ///
    /// - `Some(set)`: The published values; empty when the zone has no
    ///   matching record set or the provider returned no container
    /// - `None`: The provider call failed, so the zone state is unknown
    pub async fn list_records(&self, record_type: RecordType) -> Option<AddressSet> {
        let listing = match self
            .provider
            .list_record_sets(&self.record_name, record_type)
            .await
        {
            Ok(listing) => listing,
            Err(e) => {
                error!(
                    "list_records({}): {} lookup for {} failed: {}",
                    record_type,
                    self.provider.provider_name(),
                    self.record_name,
                    e
                );
                return None;
            }
        };

        let Some(record_sets) = listing else {
            error!(
                "list_records({}): No record sets in {} response for {}",
                record_type,
                self.provider.provider_name(),
                self.record_name
            );
            return Some(AddressSet::empty());
        };

        match record_sets.first() {
            Some(first) if self.is_requested(first, record_type) => {
                debug!(
                    "list_records({}): {} published for {}: {:?}",
                    record_type,
                    first.values.len(),
                    self.record_name,
                    first.values
                );
                Some(AddressSet::new(first.values.clone()))
            }
            Some(first) => {
                debug!(
                    "list_records({}): no record for {}, listing starts at {} {}",
                    record_type, self.record_name, first.name, first.record_type
                );
                Some(AddressSet::empty())
            }
            None => {
                debug!(
                    "list_records({}): no record for {}",
                    record_type, self.record_name
                );
                Some(AddressSet::empty())
            }
        }
    }

    fn is_requested(&self, record_set: &RecordSet, record_type: RecordType) -> bool {
        names_match(&record_set.name, &self.record_name)
            && record_set.record_type.eq_ignore_ascii_case(record_type.as_str())
    }
}

/// Compare two DNS names
///
/// ASCII case is ignored, as is a trailing dot. Route 53 spells a leading
/// wildcard as `\052`, which is decoded before comparing.
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

fn normalize_name(name: &str) -> String {
    name.trim_end_matches('.')
        .replace("\\052", "*")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChangeStatus;
    use crate::types::ChangeRequest;
    use async_trait::async_trait;

    /// Returns a canned listing
    struct ListingProvider(std::result::Result<Option<Vec<RecordSet>>, &'static str>);

    #[async_trait]
    impl DnsProvider for ListingProvider {
        async fn list_record_sets(
            &self,
            _start_name: &str,
            _start_type: RecordType,
        ) -> crate::Result<Option<Vec<RecordSet>>> {
            match &self.0 {
                Ok(listing) => Ok(listing.clone()),
                Err(message) => Err(crate::Error::provider("test", *message)),
            }
        }

        async fn change_record_sets(&self, _change: &ChangeRequest) -> crate::Result<ChangeStatus> {
            Err(crate::Error::dns_provider("read-only"))
        }

        fn provider_name(&self) -> &'static str {
            "test"
        }
    }

    fn record_set(name: &str, record_type: &str, values: &[&str]) -> RecordSet {
        RecordSet {
            name: name.to_string(),
            record_type: record_type.to_string(),
            ttl: Some(300),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn reader(listing: std::result::Result<Option<Vec<RecordSet>>, &'static str>) -> ZoneReader {
        ZoneReader::new(Arc::new(ListingProvider(listing)), "home.example.com.")
    }

    #[tokio::test]
    async fn matching_first_entry_returns_its_values() {
        let reader = reader(Ok(Some(vec![record_set(
            "home.example.com.",
            "A",
            &["198.51.100.9", "198.51.100.10"],
        )])));

        let set = reader.list_records(RecordType::A).await.unwrap();
        assert_eq!(set.values(), ["198.51.100.9", "198.51.100.10"]);
    }

    #[tokio::test]
    async fn mismatched_name_is_treated_as_no_record() {
        let reader = reader(Ok(Some(vec![record_set(
            "www.example.com.",
            "A",
            &["198.51.100.9"],
        )])));

        let set = reader.list_records(RecordType::A).await.unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn mismatched_type_is_treated_as_no_record() {
        let reader = reader(Ok(Some(vec![record_set(
            "home.example.com.",
            "MX",
            &["10 mail.example.com."],
        )])));

        let set = reader.list_records(RecordType::Aaaa).await.unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn only_first_entry_is_inspected() {
        let reader = reader(Ok(Some(vec![
            record_set("home.example.com.", "A", &["198.51.100.9"]),
            record_set("home.example.com.", "AAAA", &["2001:db8::1"]),
        ])));

        let set = reader.list_records(RecordType::Aaaa).await.unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn missing_container_yields_empty_set() {
        let set = reader(Ok(None)).list_records(RecordType::A).await.unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn empty_container_yields_empty_set() {
        let set = reader(Ok(Some(Vec::new())))
            .list_records(RecordType::A)
            .await
            .unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_yields_none() {
        let set = reader(Err("AccessDenied")).list_records(RecordType::A).await;
        assert!(set.is_none());
    }

    #[test]
    fn wildcard_and_case_are_normalized() {
        assert!(names_match("\\052.example.com.", "*.example.com."));
        assert!(names_match("Home.Example.COM.", "home.example.com."));
        assert!(names_match("home.example.com", "home.example.com."));
        assert!(!names_match("home.example.com.", "www.example.com."));
    }
}
