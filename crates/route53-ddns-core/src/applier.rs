//! Change Applier
//!
//! Logs every computed change and, in live mode, submits it to the provider
//! as a single-change batch. NONE requests are neither logged nor submitted.

use std::sync::Arc;
use tracing::{error, info};

use crate::config::ApplyMode;
use crate::traits::{ChangeStatus, DnsProvider};
use crate::types::ChangeRequest;

/// What happened to a change request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// NONE request, nothing submitted
    Skipped,
    /// Change logged but not submitted
    DryRun,
    /// Provider accepted the change
    Submitted(ChangeStatus),
    /// Provider rejected the change or could not be reached
    Failed(String),
}

/// Submits change requests to a [`DnsProvider`]
pub struct ChangeApplier {
    provider: Arc<dyn DnsProvider>,
    mode: ApplyMode,
}

impl ChangeApplier {
    pub fn new(provider: Arc<dyn DnsProvider>, mode: ApplyMode) -> Self {
        Self { provider, mode }
    }

    pub fn mode(&self) -> ApplyMode {
        self.mode
    }

    /// Log and (in live mode) submit `change`; NONE returns without logging
    pub async fn apply(&self, change: &ChangeRequest) -> ApplyOutcome {
        if !change.is_change() {
            return ApplyOutcome::Skipped;
        }

        info!(
            "apply({}): change request {}",
            change.record_type(),
            render(change)
        );

        if self.mode == ApplyMode::DryRun {
            info!(
                "apply({}): dry run, {} for {} not submitted",
                change.record_type(),
                change.action(),
                change.record_name()
            );
            return ApplyOutcome::DryRun;
        }

        match self.provider.change_record_sets(change).await {
            Ok(status) => {
                info!(
                    "apply({}): {} accepted {} for {} (change {}, status {})",
                    change.record_type(),
                    self.provider.provider_name(),
                    change.action(),
                    change.record_name(),
                    status.id,
                    status.status
                );
                ApplyOutcome::Submitted(status)
            }
            Err(e) => {
                error!(
                    "apply({}): {} rejected {} for {}: {}",
                    change.record_type(),
                    self.provider.provider_name(),
                    change.action(),
                    change.record_name(),
                    e
                );
                ApplyOutcome::Failed(e.to_string())
            }
        }
    }
}

/// JSON rendering of a change request, for the log
fn render(change: &ChangeRequest) -> String {
    serde_json::to_string(change).unwrap_or_else(|_| format!("{:?}", change))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RecordSet;
    use crate::types::{ChangeAction, RecordType};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        changes: AtomicUsize,
        fail: bool,
    }

    impl CountingProvider {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                changes: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl DnsProvider for CountingProvider {
        async fn list_record_sets(
            &self,
            _start_name: &str,
            _start_type: RecordType,
        ) -> crate::Result<Option<Vec<RecordSet>>> {
            Ok(None)
        }

        async fn change_record_sets(&self, _change: &ChangeRequest) -> crate::Result<ChangeStatus> {
            self.changes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(crate::Error::provider("counting", "InvalidChangeBatch"));
            }
            Ok(ChangeStatus {
                id: "/change/C1".to_string(),
                status: "PENDING".to_string(),
            })
        }

        fn provider_name(&self) -> &'static str {
            "counting"
        }
    }

    fn create() -> ChangeRequest {
        ChangeRequest::new(
            ChangeAction::Create,
            "home.example.com.",
            RecordType::A,
            300,
            vec!["198.51.100.9".to_string()],
        )
    }

    #[tokio::test]
    async fn noop_is_never_submitted() {
        let provider = CountingProvider::new(false);
        let applier = ChangeApplier::new(provider.clone(), ApplyMode::Live);

        let noop = ChangeRequest::noop("home.example.com.", RecordType::A, 300);
        assert_eq!(applier.apply(&noop).await, ApplyOutcome::Skipped);
        assert_eq!(provider.changes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dry_run_does_not_touch_provider() {
        let provider = CountingProvider::new(false);
        let applier = ChangeApplier::new(provider.clone(), ApplyMode::DryRun);

        assert_eq!(applier.apply(&create()).await, ApplyOutcome::DryRun);
        assert_eq!(provider.changes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn live_mode_submits_once() {
        let provider = CountingProvider::new(false);
        let applier = ChangeApplier::new(provider.clone(), ApplyMode::Live);

        match applier.apply(&create()).await {
            ApplyOutcome::Submitted(status) => assert_eq!(status.status, "PENDING"),
            other => panic!("expected submission, got {:?}", other),
        }
        assert_eq!(provider.changes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_failure_is_reported() {
        let provider = CountingProvider::new(true);
        let applier = ChangeApplier::new(provider.clone(), ApplyMode::Live);

        match applier.apply(&create()).await {
            ApplyOutcome::Failed(message) => assert!(message.contains("InvalidChangeBatch")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn change_request_renders_as_json() {
        assert_eq!(
            render(&create()),
            r#"{"action":"CREATE","record_name":"home.example.com.","record_type":"A","ttl":300,"values":["198.51.100.9"]}"#
        );
    }
}
