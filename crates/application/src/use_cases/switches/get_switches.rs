use crate::ports::SwitchRepository;
use porttrace_domain::{DomainError, Switch};
use std::sync::Arc;

pub struct GetSwitchesUseCase {
    repo: Arc<dyn SwitchRepository>,
}

impl GetSwitchesUseCase {
    pub fn new(repo: Arc<dyn SwitchRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> Result<Vec<Switch>, DomainError> {
        self.repo.get_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Switch, DomainError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(DomainError::SwitchNotFound(id))
    }
}
