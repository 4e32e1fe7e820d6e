use async_trait::async_trait;
use porttrace_domain::{DomainError, QueryHistoryEntry};
use std::net::IpAddr;

#[async_trait]
pub trait QueryHistoryRepository: Send + Sync {
    /// Most recent rows first
    async fn get_recent(
        &self,
        limit: u32,
        target_ip: Option<IpAddr>,
    ) -> Result<Vec<QueryHistoryEntry>, DomainError>;

    /// Delete rows older than N days (data retention)
    async fn delete_older_than(&self, days: u32) -> Result<u64, DomainError>;
}
