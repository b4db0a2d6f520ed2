// # route53-ddns-core
//
// Core library for Route 53 dynamic DNS updates.
//
// ## Architecture Overview
//
// One pass reconciles the A/AAAA records of a single hostname:
// - **IpSource**: Trait for fetching the public address from an echo service
// - **DnsProvider**: Trait for reading and changing hosted-zone record sets
// - **IpResolver**: Validates the echo answer into an observed address
// - **ZoneReader**: Reads the values currently published
// - **Reconciler**: Decides CREATE, UPSERT or nothing
// - **ChangeApplier**: Logs the change and submits it in live mode
// - **DdnsEngine**: Runs the above for each configured record type
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decisions live here, transports in plugin crates
// 2. **Absorbed Failures**: A pass never errors; failures are logged per type
// 3. **Idempotency**: A record that already holds the observed address is left alone
// 4. **Library-First**: The binary only parses arguments and wires plugins

pub mod applier;
pub mod config;
pub mod engine;
pub mod error;
pub mod reconcile;
pub mod resolver;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod zone;

// Re-export core types for convenience
pub use applier::{ApplyOutcome, ChangeApplier};
pub use config::{ApplyMode, DdnsConfig, IpSourceConfig, LogConfig, ProviderConfig, RetryConfig};
pub use engine::{DdnsEngine, RunSummary, TypeOutcome, TypeReport};
pub use error::{Error, Result};
pub use reconcile::Reconciler;
pub use resolver::IpResolver;
pub use telemetry::LogHandle;
pub use traits::{ChangeStatus, DnsProvider, IpSource, RecordSet};
pub use types::{AddressSet, ChangeAction, ChangeRequest, RecordType, DEFAULT_TTL};
pub use zone::ZoneReader;
