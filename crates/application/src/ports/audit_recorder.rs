use async_trait::async_trait;
use porttrace_domain::{DomainError, ResolutionOutcome, ResolutionQuery};

/// Persists one history row per completed resolution.
#[async_trait]
pub trait AuditRecorder: Send + Sync {
    /// Returns the id of the stored history row.
    async fn record(
        &self,
        query: &ResolutionQuery,
        outcome: &ResolutionOutcome,
    ) -> Result<i64, DomainError>;
}
