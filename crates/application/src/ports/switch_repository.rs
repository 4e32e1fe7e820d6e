use async_trait::async_trait;
use porttrace_domain::{DomainError, NewSwitch, Reachability, Switch, SwitchCredential};
use std::net::IpAddr;

#[async_trait]
pub trait SwitchRepository: Send + Sync {
    /// All switches, enabled or not, ordered by name
    async fn get_all(&self) -> Result<Vec<Switch>, DomainError>;

    /// Switches with `enabled = true`, in no particular order
    async fn list_enabled(&self) -> Result<Vec<Switch>, DomainError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Switch>, DomainError>;

    async fn get_by_ip(&self, ip_address: IpAddr) -> Result<Option<Switch>, DomainError>;

    /// Persist a new switch together with its login secrets
    async fn create(
        &self,
        switch: NewSwitch,
        credential: SwitchCredential,
    ) -> Result<Switch, DomainError>;

    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    async fn set_enabled(&self, id: i64, enabled: bool) -> Result<Switch, DomainError>;

    /// Store the result of a reachability check
    async fn update_reachability(
        &self,
        id: i64,
        reachability: Reachability,
    ) -> Result<(), DomainError>;
}
