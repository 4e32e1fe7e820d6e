use async_trait::async_trait;
use porttrace_domain::{DomainError, SwitchCredential};

/// Source of decrypted login secrets for a switch.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get_credential(&self, switch_id: i64) -> Result<SwitchCredential, DomainError>;
}
