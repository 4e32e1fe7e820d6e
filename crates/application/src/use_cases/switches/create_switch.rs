use crate::ports::SwitchRepository;
use porttrace_domain::{DomainError, NewSwitch, Switch, SwitchCredential};
use std::sync::Arc;
use tracing::info;

pub struct CreateSwitchUseCase {
    repo: Arc<dyn SwitchRepository>,
}

impl CreateSwitchUseCase {
    pub fn new(repo: Arc<dyn SwitchRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        switch: NewSwitch,
        credential: SwitchCredential,
    ) -> Result<Switch, DomainError> {
        switch.validate()?;

        if credential.password.is_empty() {
            return Err(DomainError::InvalidSwitch("password is required".to_string()));
        }

        if self.repo.get_by_ip(switch.ip_address).await?.is_some() {
            return Err(DomainError::DuplicateSwitch(switch.ip_address.to_string()));
        }

        let created = self.repo.create(switch, credential).await?;

        info!(
            switch_id = created.id,
            name = %created.name,
            ip = %created.ip_address,
            vendor = %created.vendor,
            role = %created.role,
            "Switch created"
        );

        Ok(created)
    }
}
