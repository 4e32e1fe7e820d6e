use crate::ports::MacCacheRepository;
use porttrace_domain::{DomainError, MacAddress, MacCacheEntry};
use std::sync::Arc;

pub struct LookupMacCacheUseCase {
    repo: Arc<dyn MacCacheRepository>,
}

impl LookupMacCacheUseCase {
    pub fn new(repo: Arc<dyn MacCacheRepository>) -> Self {
        Self { repo }
    }

    /// Accepts any notation `MacAddress` parses.
    pub async fn execute(&self, mac: &str) -> Result<Vec<MacCacheEntry>, DomainError> {
        let mac: MacAddress = mac.parse()?;
        self.repo.find_by_mac(&mac).await
    }
}
