//! Core DDNS engine
//!
//! The DdnsEngine runs one reconciliation pass over the configured record
//! types. For each type it:
//! - Reads the published values via the Zone Reader
//! - Resolves the observed public address via the IP Resolver
//! - Computes the change via the Reconciler
//! - Logs and (in live mode) submits it via the Change Applier
//!
//! ## Architecture
//!
//! ```text
//!                      ┌──────────────┐
//!                      │  DdnsEngine  │  (per record type, in order)
//!                      └──────────────┘
//!                             │
//!         ┌───────────────────┼────────────────────┐
//!         ▼                   ▼                    │
//! ┌──────────────┐    ┌──────────────┐             │
//! │  ZoneReader  │    │  IpResolver  │             │
//! │ (DnsProvider)│    │  (IpSource)  │             │
//! └──────────────┘    └──────────────┘             │
//!         │ existing          │ observed           │
//!         └─────────┬─────────┘                    │
//!                   ▼                              ▼
//!           ┌──────────────┐  ChangeRequest ┌───────────────┐
//!           │  Reconciler  │───────────────▶│ ChangeApplier │
//!           └──────────────┘                └───────────────┘
//! ```
//!
//! ## Failure Handling
//!
//! Nothing in a pass returns an error. Each component logs its failure and
//! hands back an empty result; the engine records what happened per type in
//! the [`RunSummary`] and moves on to the next type.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::applier::{ApplyOutcome, ChangeApplier};
use crate::config::DdnsConfig;
use crate::error::Result;
use crate::reconcile::Reconciler;
use crate::resolver::IpResolver;
use crate::traits::{ChangeStatus, DnsProvider, IpSource};
use crate::types::{ChangeRequest, RecordType};
use crate::zone::ZoneReader;

/// What a pass did for one record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeOutcome {
    /// The type name is not A or AAAA; nothing was called
    Rejected,
    /// The published values could not be read
    ZoneUnavailable,
    /// No usable public address was resolved
    AddressUnavailable,
    /// The zone already publishes the observed address
    UpToDate,
    /// A change was computed and logged but not submitted
    DryRun(ChangeRequest),
    /// The provider accepted the change
    Submitted(ChangeRequest, ChangeStatus),
    /// The provider did not accept the change
    Failed(ChangeRequest, String),
}

impl TypeOutcome {
    /// Short label for the run summary
    pub fn label(&self) -> &'static str {
        match self {
            TypeOutcome::Rejected => "rejected",
            TypeOutcome::ZoneUnavailable => "zone unavailable",
            TypeOutcome::AddressUnavailable => "address unavailable",
            TypeOutcome::UpToDate => "up to date",
            TypeOutcome::DryRun(_) => "dry run",
            TypeOutcome::Submitted(..) => "submitted",
            TypeOutcome::Failed(..) => "failed",
        }
    }

    /// The computed change, if one was produced
    pub fn change(&self) -> Option<&ChangeRequest> {
        match self {
            TypeOutcome::DryRun(change)
            | TypeOutcome::Submitted(change, _)
            | TypeOutcome::Failed(change, _) => Some(change),
            _ => None,
        }
    }
}

/// Outcome of one record type within a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReport {
    /// Record type name as configured
    pub record_type: String,
    pub outcome: TypeOutcome,
}

/// Outcome of a full pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub reports: Vec<TypeReport>,
}

impl RunSummary {
    /// Outcome for `record_type`, if it was handled
    pub fn outcome(&self, record_type: &str) -> Option<&TypeOutcome> {
        self.reports
            .iter()
            .find(|report| report.record_type.eq_ignore_ascii_case(record_type))
            .map(|report| &report.outcome)
    }

    /// Whether any provider submission failed
    pub fn has_failures(&self) -> bool {
        self.reports
            .iter()
            .any(|report| matches!(report.outcome, TypeOutcome::Failed(..)))
    }
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Call [`DdnsEngine::run()`] once per invocation
/// 3. Drop
///
/// ## Threading
///
/// All work is awaited in sequence; no two operations overlap.
pub struct DdnsEngine {
    /// Record types to handle, in order
    record_types: Vec<String>,

    /// Fully-qualified record name (trailing dot)
    record_name: String,

    /// Reads published values
    zone: ZoneReader,

    /// Resolves the public address
    resolver: IpResolver,

    /// Computes changes
    reconciler: Reconciler,

    /// Logs and submits changes
    applier: ChangeApplier,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: DDNS configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] when the configuration is invalid.
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: &DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        let provider: Arc<dyn DnsProvider> = Arc::from(provider);
        let record_name = config.record_name();

        Ok(Self {
            record_types: config.record_types.clone(),
            zone: ZoneReader::new(provider.clone(), record_name.clone()),
            resolver: IpResolver::new(ip_source),
            reconciler: Reconciler::new(record_name.clone(), config.ttl),
            applier: ChangeApplier::new(provider, config.apply_mode),
            record_name,
        })
    }

    /// Fully-qualified record name this engine manages
    pub fn record_name(&self) -> &str {
        &self.record_name
    }

    /// Run one pass over every configured record type
    pub async fn run(&self) -> RunSummary {
        info!(
            "Updating {} ({}, {:?})",
            self.record_name,
            self.record_types.join(", "),
            self.applier.mode()
        );

        let mut summary = RunSummary::default();
        for name in &self.record_types {
            let outcome = self.handle_type_name(name).await;
            debug!("{} {}: {}", self.record_name, name, outcome.label());
            summary.reports.push(TypeReport {
                record_type: name.clone(),
                outcome,
            });
        }
        summary
    }

    /// Handle a record type given by name
    ///
    /// Names other than A and AAAA are rejected before any collaborator is
    /// called.
    pub async fn handle_type_name(&self, name: &str) -> TypeOutcome {
        match name.parse::<RecordType>() {
            Ok(record_type) => self.handle_type(record_type).await,
            Err(e) => {
                error!("Unsupported record type for {}: {}", self.record_name, e);
                TypeOutcome::Rejected
            }
        }
    }

    /// Reconcile one record type
    pub async fn handle_type(&self, record_type: RecordType) -> TypeOutcome {
        let Some(existing) = self.zone.list_records(record_type).await else {
            warn!(
                "{} {}: zone state unknown, skipping",
                self.record_name, record_type
            );
            return TypeOutcome::ZoneUnavailable;
        };

        let Some(observed) = self.resolver.resolve(record_type).await else {
            warn!(
                "{} {}: no {} address resolved, skipping",
                self.record_name,
                record_type,
                record_type.family()
            );
            return TypeOutcome::AddressUnavailable;
        };

        let change = self
            .reconciler
            .reconcile(record_type, &existing, &[observed]);

        match self.applier.apply(&change).await {
            ApplyOutcome::Skipped => TypeOutcome::UpToDate,
            ApplyOutcome::DryRun => TypeOutcome::DryRun(change),
            ApplyOutcome::Submitted(status) => TypeOutcome::Submitted(change, status),
            ApplyOutcome::Failed(message) => TypeOutcome::Failed(change, message),
        }
    }
}
