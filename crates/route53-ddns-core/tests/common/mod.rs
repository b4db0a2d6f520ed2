//! Test doubles and common utilities for contract tests
//!
//! The doubles count their calls so tests can assert which collaborators a
//! pass touched, and record submitted changes for inspection.

#![allow(dead_code)]

use route53_ddns_core::config::{ApplyMode, DdnsConfig};
use route53_ddns_core::error::Result;
use route53_ddns_core::traits::{ChangeStatus, DnsProvider, IpSource, RecordSet};
use route53_ddns_core::types::{ChangeRequest, RecordType};
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

/// An IpSource answering each record type with a canned body
pub struct MockIpSource {
    /// Body per record type; missing types fail like a network error
    bodies: HashMap<RecordType, String>,
    /// Call counter for fetch()
    fetch_call_count: Arc<AtomicUsize>,
}

impl MockIpSource {
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer `record_type` lookups with `body`
    pub fn answering(mut self, record_type: RecordType, body: &str) -> Self {
        self.bodies.insert(record_type, body.to_string());
        self
    }

    /// Get the number of times fetch() was called
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Create a new MockIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            bodies: other.bodies.clone(),
            fetch_call_count: Arc::clone(&other.fetch_call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for MockIpSource {
    async fn fetch(&self, record_type: RecordType) -> Result<String> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        self.bodies.get(&record_type).cloned().ok_or_else(|| {
            route53_ddns_core::Error::http(format!("no route to {} echo service", record_type))
        })
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

/// What MockDnsProvider answers to list calls
#[derive(Clone)]
enum Listing {
    Sets(Option<Vec<RecordSet>>),
    Fails(String),
}

/// A mock DnsProvider with a fixed zone listing that records changes
pub struct MockDnsProvider {
    /// Listing per start type
    listings: HashMap<RecordType, Listing>,
    /// Reject every change with this message
    reject_changes: Option<String>,
    /// Call counter for list_record_sets()
    list_call_count: Arc<AtomicUsize>,
    /// Call counter for change_record_sets()
    change_call_count: Arc<AtomicUsize>,
    /// Changes submitted through change_record_sets()
    submitted: Arc<Mutex<Vec<ChangeRequest>>>,
    /// Start names passed to list_record_sets()
    listed_names: Arc<Mutex<Vec<String>>>,
    /// Provider name
    pub name: &'static str,
}

impl MockDnsProvider {
    /// A provider whose zone holds no record for any type
    pub fn new(name: &'static str) -> Self {
        Self {
            listings: HashMap::new(),
            reject_changes: None,
            list_call_count: Arc::new(AtomicUsize::new(0)),
            change_call_count: Arc::new(AtomicUsize::new(0)),
            submitted: Arc::new(Mutex::new(Vec::new())),
            listed_names: Arc::new(Mutex::new(Vec::new())),
            name,
        }
    }

    /// Publish `values` for (`record_name`, `record_type`)
    pub fn with_record(mut self, record_name: &str, record_type: RecordType, values: &[&str]) -> Self {
        self.listings.insert(
            record_type,
            Listing::Sets(Some(vec![RecordSet {
                name: record_name.to_string(),
                record_type: record_type.as_str().to_string(),
                ttl: Some(300),
                values: values.iter().map(|v| v.to_string()).collect(),
            }])),
        );
        self
    }

    /// Make listings for `record_type` fail
    pub fn failing_list(mut self, record_type: RecordType, message: &str) -> Self {
        self.listings
            .insert(record_type, Listing::Fails(message.to_string()));
        self
    }

    /// Make every change submission fail
    pub fn rejecting_changes(mut self, message: &str) -> Self {
        self.reject_changes = Some(message.to_string());
        self
    }

    /// Get the number of times list_record_sets() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times change_record_sets() was called
    pub fn change_call_count(&self) -> usize {
        self.change_call_count.load(Ordering::SeqCst)
    }

    /// Get the changes submitted so far
    pub fn submitted(&self) -> Vec<ChangeRequest> {
        self.submitted.lock().unwrap().clone()
    }

    /// Get the start names list_record_sets() was called with
    pub fn listed_names(&self) -> Vec<String> {
        self.listed_names.lock().unwrap().clone()
    }

    /// Create a new MockDnsProvider that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            listings: other.listings.clone(),
            reject_changes: other.reject_changes.clone(),
            list_call_count: Arc::clone(&other.list_call_count),
            change_call_count: Arc::clone(&other.change_call_count),
            submitted: Arc::clone(&other.submitted),
            listed_names: Arc::clone(&other.listed_names),
            name: other.name,
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_record_sets(
        &self,
        start_name: &str,
        start_type: RecordType,
    ) -> Result<Option<Vec<RecordSet>>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        self.listed_names
            .lock()
            .unwrap()
            .push(start_name.to_string());
        match self.listings.get(&start_type) {
            Some(Listing::Sets(sets)) => Ok(sets.clone()),
            Some(Listing::Fails(message)) => {
                Err(route53_ddns_core::Error::provider(self.name, message.clone()))
            }
            None => Ok(Some(Vec::new())),
        }
    }

    async fn change_record_sets(&self, change: &ChangeRequest) -> Result<ChangeStatus> {
        self.change_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.reject_changes {
            return Err(route53_ddns_core::Error::provider(self.name, message.clone()));
        }
        self.submitted.lock().unwrap().push(change.clone());

        Ok(ChangeStatus {
            id: format!("/change/C{}", self.change_call_count()),
            status: "PENDING".to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}

/// Collects formatted log lines for the current thread
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    _guard: DefaultGuard,
}

impl LogCapture {
    /// Install a capturing subscriber at debug level
    pub fn install() -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = CaptureWriter(Arc::clone(&buffer));
        let subscriber = route53_ddns_core::telemetry::build_subscriber(
            tracing::Level::DEBUG,
            move || writer.clone(),
        );
        let guard = tracing::subscriber::set_default(subscriber);
        Self {
            buffer,
            _guard: guard,
        }
    }

    /// Everything logged so far
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }

    /// Whether a line at `level` contains `needle`
    pub fn contains(&self, level: &str, needle: &str) -> bool {
        let marker = format!(" - {} - ", level);
        self.text()
            .lines()
            .any(|line| line.contains(&marker) && line.contains(needle))
    }
}

#[derive(Clone)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(hostname: &str) -> DdnsConfig {
    DdnsConfig::new("test-profile", "ZTESTZONE", hostname)
}

/// Like [`minimal_config`], but changes are submitted
pub fn live_config(hostname: &str) -> DdnsConfig {
    let mut config = minimal_config(hostname);
    config.apply_mode = ApplyMode::Live;
    config
}
