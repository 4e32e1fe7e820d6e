use porttrace_application::use_cases::CheckSwitchStatusUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Periodically refreshes `is_reachable` / `response_time_ms` for every
/// enabled switch.
pub struct SwitchStatusJob {
    check: Arc<CheckSwitchStatusUseCase>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl SwitchStatusJob {
    pub fn new(check: Arc<CheckSwitchStatusUseCase>) -> Self {
        Self {
            check,
            interval_secs: 30,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting switch status job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("SwitchStatusJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(e) = self.check.execute().await {
                            error!(error = %e, "Switch status check failed");
                        }
                    }
                }
            }
        });
    }
}
