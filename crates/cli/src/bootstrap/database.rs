use porttrace_domain::config::DatabaseConfig;
use porttrace_infrastructure::database::create_pool;
use sqlx::SqlitePool;
use tracing::{debug, error};

pub async fn init_database(cfg: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    debug!(path = %cfg.path, "Initializing database");

    let pool = create_pool(cfg).await.map_err(|e| {
        error!("Failed to initialize database: {}", e);
        anyhow::anyhow!(e)
    })?;

    debug!(max_connections = cfg.max_connections, "Database pool ready");
    Ok(pool)
}
