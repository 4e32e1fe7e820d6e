use crate::ports::SwitchRepository;
use porttrace_domain::{DomainError, Switch};
use std::sync::Arc;
use tracing::info;

pub struct SetSwitchEnabledUseCase {
    repo: Arc<dyn SwitchRepository>,
}

impl SetSwitchEnabledUseCase {
    pub fn new(repo: Arc<dyn SwitchRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: i64, enabled: bool) -> Result<Switch, DomainError> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Err(DomainError::SwitchNotFound(id));
        }

        let switch = self.repo.set_enabled(id, enabled).await?;
        info!(switch_id = id, enabled, "Switch toggled");
        Ok(switch)
    }
}
