use porttrace_domain::{Config, DomainError};
use porttrace_infrastructure::repositories::{
    SqliteMacCacheRepository, SqliteQueryHistoryRepository, SqliteSwitchRepository,
};
use porttrace_infrastructure::security::CredentialCipher;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Repositories {
    pub switches: Arc<SqliteSwitchRepository>,
    pub history: Arc<SqliteQueryHistoryRepository>,
    pub mac_cache: Arc<SqliteMacCacheRepository>,
}

impl Repositories {
    pub fn new(pool: SqlitePool, config: &Config) -> Result<Self, DomainError> {
        let cipher = Arc::new(CredentialCipher::load_or_create(&config.security)?);
        Ok(Self {
            switches: Arc::new(SqliteSwitchRepository::new(pool.clone(), cipher)),
            history: Arc::new(SqliteQueryHistoryRepository::new(
                pool.clone(),
                &config.database,
            )),
            mac_cache: Arc::new(SqliteMacCacheRepository::new(pool)),
        })
    }
}
