use super::switch_row_mapper::{row_to_switch, SwitchRow, SWITCH_SELECT};
use crate::security::CredentialCipher;
use async_trait::async_trait;
use porttrace_application::ports::{CredentialStore, SwitchRepository};
use porttrace_domain::{DomainError, NewSwitch, Reachability, Switch, SwitchCredential};
use sqlx::SqlitePool;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{error, instrument};

/// Switch inventory. Passwords are sealed with the credential cipher before
/// they reach the database and only opened in `get_credential`.
pub struct SqliteSwitchRepository {
    pool: SqlitePool,
    cipher: Arc<CredentialCipher>,
}

impl SqliteSwitchRepository {
    pub fn new(pool: SqlitePool, cipher: Arc<CredentialCipher>) -> Self {
        Self { pool, cipher }
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Switch>, DomainError> {
        let query = format!("{} WHERE id = ?", SWITCH_SELECT);
        let row = sqlx::query_as::<_, SwitchRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query switch by id");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.and_then(row_to_switch))
    }
}

#[async_trait]
impl SwitchRepository for SqliteSwitchRepository {
    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Switch>, DomainError> {
        let query = format!("{} ORDER BY name, id", SWITCH_SELECT);
        let rows = sqlx::query_as::<_, SwitchRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list switches");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(rows.into_iter().filter_map(row_to_switch).collect())
    }

    #[instrument(skip(self))]
    async fn list_enabled(&self) -> Result<Vec<Switch>, DomainError> {
        let query = format!("{} WHERE enabled = 1", SWITCH_SELECT);
        let rows = sqlx::query_as::<_, SwitchRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list enabled switches");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(rows.into_iter().filter_map(row_to_switch).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Option<Switch>, DomainError> {
        self.fetch_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn get_by_ip(&self, ip_address: IpAddr) -> Result<Option<Switch>, DomainError> {
        let query = format!("{} WHERE ip_address = ?", SWITCH_SELECT);
        let row = sqlx::query_as::<_, SwitchRow>(&query)
            .bind(ip_address.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query switch by ip");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.and_then(row_to_switch))
    }

    #[instrument(skip(self, credential))]
    async fn create(
        &self,
        switch: NewSwitch,
        credential: SwitchCredential,
    ) -> Result<Switch, DomainError> {
        let password = self.cipher.encrypt(&credential.password)?;
        let enable_password = credential
            .enable_password
            .as_deref()
            .map(|p| self.cipher.encrypt(p))
            .transpose()?;

        let result = sqlx::query(
            "INSERT INTO switches (name, ip_address, vendor, model, role, priority, ssh_port,
                                   username, password_encrypted, enable_password_encrypted,
                                   connection_timeout, enabled)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(switch.name.trim())
        .bind(switch.ip_address.to_string())
        .bind(switch.vendor.as_str())
        .bind(&switch.model)
        .bind(switch.role.as_str())
        .bind(switch.priority as i64)
        .bind(switch.ssh_port as i64)
        .bind(&switch.username)
        .bind(&password)
        .bind(&enable_password)
        .bind(switch.connection_timeout as i64)
        .bind(switch.enabled as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                DomainError::DuplicateSwitch(switch.ip_address.to_string())
            } else {
                error!(error = %e, "Failed to create switch");
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        let id = result.last_insert_rowid();
        self.fetch_by_id(id)
            .await?
            .ok_or(DomainError::SwitchNotFound(id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM switches WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete switch");
                DomainError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SwitchNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_enabled(&self, id: i64, enabled: bool) -> Result<Switch, DomainError> {
        let result = sqlx::query(
            "UPDATE switches SET enabled = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(enabled as i64)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update switch enabled flag");
            DomainError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SwitchNotFound(id));
        }
        self.fetch_by_id(id)
            .await?
            .ok_or(DomainError::SwitchNotFound(id))
    }

    #[instrument(skip(self))]
    async fn update_reachability(
        &self,
        id: i64,
        reachability: Reachability,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE switches SET
                 is_reachable = ?,
                 response_time_ms = ?,
                 last_check_at = CURRENT_TIMESTAMP
             WHERE id = ?",
        )
        .bind(reachability.reachable as i64)
        .bind(reachability.response_time_ms.map(|ms| ms as i64))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, switch_id = id, "Failed to store reachability");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteSwitchRepository {
    #[instrument(skip(self))]
    async fn get_credential(&self, switch_id: i64) -> Result<SwitchCredential, DomainError> {
        let row = sqlx::query_as::<_, (String, Option<String>)>(
            "SELECT password_encrypted, enable_password_encrypted FROM switches WHERE id = ?",
        )
        .bind(switch_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load switch credential");
            DomainError::DatabaseError(e.to_string())
        })?;

        let (password, enable_password) = row.ok_or(DomainError::SwitchNotFound(switch_id))?;

        let credential = SwitchCredential::new(self.cipher.decrypt(&password)?);
        Ok(match enable_password {
            Some(sealed) => credential.with_enable_password(self.cipher.decrypt(&sealed)?),
            None => credential,
        })
    }
}
