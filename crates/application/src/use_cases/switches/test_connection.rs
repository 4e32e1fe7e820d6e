use crate::ports::{CredentialStore, SwitchConnector, SwitchRepository};
use crate::use_cases::lookup::SwitchProber;
use porttrace_domain::{DomainError, LookupOperation, ResolutionFragment};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionTestReport {
    pub switch_id: i64,
    pub success: bool,
    pub message: String,
    pub output_len: Option<usize>,
    pub elapsed_ms: u64,
}

/// Use case: log in to a switch and run its harmless test command.
/// Connection failures are reported, not returned as errors.
pub struct TestSwitchConnectionUseCase {
    repo: Arc<dyn SwitchRepository>,
    prober: SwitchProber,
}

impl TestSwitchConnectionUseCase {
    pub fn new(
        repo: Arc<dyn SwitchRepository>,
        credentials: Arc<dyn CredentialStore>,
        connector: Arc<dyn SwitchConnector>,
        command_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            prober: SwitchProber::new(credentials, connector, command_timeout),
        }
    }

    pub async fn execute(&self, id: i64) -> Result<ConnectionTestReport, DomainError> {
        let switch = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(DomainError::SwitchNotFound(id))?;
        let started = Instant::now();

        let result = match self.prober.open_session(&switch).await {
            Ok(mut session) => {
                let outcome = self
                    .prober
                    .execute(session.as_mut(), &switch, &LookupOperation::ConnectionTest)
                    .await;
                session.close().await;
                outcome
            }
            Err(e) => Err(e),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let report = match result {
            Ok(fragment) => {
                let output_len = match fragment {
                    ResolutionFragment::DeviceResponded { output_len } => Some(output_len),
                    _ => None,
                };
                info!(switch_id = id, name = %switch.name, elapsed_ms, "Connection test succeeded");
                ConnectionTestReport {
                    switch_id: id,
                    success: true,
                    message: "Connection successful".to_string(),
                    output_len,
                    elapsed_ms,
                }
            }
            Err(e) => {
                warn!(switch_id = id, name = %switch.name, error = %e, "Connection test failed");
                ConnectionTestReport {
                    switch_id: id,
                    success: false,
                    message: e.to_string(),
                    output_len: None,
                    elapsed_ms,
                }
            }
        };

        Ok(report)
    }
}
