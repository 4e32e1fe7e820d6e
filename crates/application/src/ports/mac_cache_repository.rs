use async_trait::async_trait;
use porttrace_domain::{DomainError, MacAddress, MacCacheEntry};

#[async_trait]
pub trait MacCacheRepository: Send + Sync {
    /// Insert or refresh the (mac, switch, port) row
    async fn upsert(&self, entry: &MacCacheEntry) -> Result<(), DomainError>;

    async fn find_by_mac(&self, mac: &MacAddress) -> Result<Vec<MacCacheEntry>, DomainError>;
}
