use crate::ports::QueryHistoryRepository;
use porttrace_domain::DomainError;
use std::sync::Arc;
use tracing::info;

/// Use case: Clean up old query history (data retention)
pub struct CleanupQueryHistoryUseCase {
    repo: Arc<dyn QueryHistoryRepository>,
}

impl CleanupQueryHistoryUseCase {
    pub fn new(repo: Arc<dyn QueryHistoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, retention_days: u32) -> Result<u64, DomainError> {
        let deleted = self.repo.delete_older_than(retention_days).await?;
        info!(deleted, retention_days, "Old query history cleaned up");
        Ok(deleted)
    }
}
