use crate::ports::{ReachabilityChecker, SwitchRepository};
use futures::future::join_all;
use porttrace_domain::DomainError;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub checked: usize,
    pub reachable: usize,
    pub unreachable: usize,
}

/// Use case: probe every enabled switch's management port and store the
/// result. Should be run periodically (e.g., every 30 seconds).
pub struct CheckSwitchStatusUseCase {
    repo: Arc<dyn SwitchRepository>,
    checker: Arc<dyn ReachabilityChecker>,
    probe_timeout: Duration,
}

impl CheckSwitchStatusUseCase {
    pub fn new(
        repo: Arc<dyn SwitchRepository>,
        checker: Arc<dyn ReachabilityChecker>,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            checker,
            probe_timeout,
        }
    }

    pub async fn execute(&self) -> Result<StatusSummary, DomainError> {
        let switches = self.repo.list_enabled().await?;
        if switches.is_empty() {
            debug!("No enabled switches to check");
            return Ok(StatusSummary::default());
        }

        let checks = switches.iter().map(|switch| async move {
            let reachability = self.checker.check(switch, self.probe_timeout).await;
            (switch, reachability)
        });
        let results = join_all(checks).await;

        let mut summary = StatusSummary {
            checked: results.len(),
            ..StatusSummary::default()
        };

        for (switch, reachability) in results {
            if reachability.reachable {
                summary.reachable += 1;
            } else {
                summary.unreachable += 1;
            }
            if let Err(e) = self.repo.update_reachability(switch.id, reachability).await {
                warn!(switch_id = switch.id, error = %e, "Failed to store switch status");
            }
        }

        info!(
            checked = summary.checked,
            reachable = summary.reachable,
            unreachable = summary.unreachable,
            "Switch status check completed"
        );
        Ok(summary)
    }
}
