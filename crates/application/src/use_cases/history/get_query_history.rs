use crate::ports::QueryHistoryRepository;
use porttrace_domain::{DomainError, QueryHistoryEntry};
use std::net::IpAddr;
use std::sync::Arc;

const MAX_LIMIT: u32 = 1000;

pub struct GetQueryHistoryUseCase {
    repo: Arc<dyn QueryHistoryRepository>,
}

impl GetQueryHistoryUseCase {
    pub fn new(repo: Arc<dyn QueryHistoryRepository>) -> Self {
        Self { repo }
    }

    /// `limit` is clamped to 1..=1000.
    pub async fn execute(
        &self,
        limit: u32,
        target_ip: Option<IpAddr>,
    ) -> Result<Vec<QueryHistoryEntry>, DomainError> {
        self.repo
            .get_recent(limit.clamp(1, MAX_LIMIT), target_ip)
            .await
    }
}
