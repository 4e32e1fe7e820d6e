use crate::ports::SwitchRepository;
use porttrace_domain::DomainError;
use std::sync::Arc;
use tracing::info;

pub struct DeleteSwitchUseCase {
    repo: Arc<dyn SwitchRepository>,
}

impl DeleteSwitchUseCase {
    pub fn new(repo: Arc<dyn SwitchRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: i64) -> Result<(), DomainError> {
        let switch = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(DomainError::SwitchNotFound(id))?;

        self.repo.delete(id).await?;

        info!(switch_id = id, name = %switch.name, "Switch deleted");
        Ok(())
    }
}
