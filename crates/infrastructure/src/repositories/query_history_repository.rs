use async_trait::async_trait;
use porttrace_application::ports::{AuditRecorder, QueryHistoryRepository};
use porttrace_domain::config::DatabaseConfig;
use porttrace_domain::{
    DomainError, QueryHistoryEntry, ResolutionOutcome, ResolutionQuery,
};
use sqlx::SqlitePool;
use std::net::IpAddr;
use tracing::{debug, error, instrument, warn};

type HistoryRow = (
    i64,
    String,
    Option<String>,
    Option<i64>,
    Option<String>,
    Option<i64>,
    String,
    Option<String>,
    i64,
    String,
);

const HISTORY_SELECT: &str = "SELECT id, target_ip, found_mac, switch_id, port_name, vlan_id,
            query_status, error_message, query_time_ms,
            datetime(queried_at) as queried_at
     FROM query_history";

/// Audit trail of resolutions. One INSERT per completed query; the per-switch
/// diagnostics are kept alongside as JSON.
pub struct SqliteQueryHistoryRepository {
    pool: SqlitePool,
    log_queries: bool,
}

impl SqliteQueryHistoryRepository {
    pub fn new(pool: SqlitePool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            log_queries: config.log_queries,
        }
    }

    fn row_to_entry(row: HistoryRow) -> Option<QueryHistoryEntry> {
        let (
            id,
            target_ip,
            found_mac,
            switch_id,
            port_name,
            vlan_id,
            query_status,
            error_message,
            query_time_ms,
            queried_at,
        ) = row;

        let query_status = match query_status.parse() {
            Ok(status) => status,
            Err(e) => {
                warn!(history_id = id, error = %e, "Skipping history row");
                return None;
            }
        };

        Some(QueryHistoryEntry {
            id: Some(id),
            target_ip: target_ip.parse().ok()?,
            found_mac,
            switch_id,
            port_name,
            vlan_id: vlan_id.map(|v| v as u16),
            query_status,
            error_message,
            query_time_ms: query_time_ms.max(0) as u64,
            queried_at: Some(queried_at),
        })
    }
}

#[async_trait]
impl AuditRecorder for SqliteQueryHistoryRepository {
    #[instrument(skip_all, fields(target = %outcome.target_ip))]
    async fn record(
        &self,
        query: &ResolutionQuery,
        outcome: &ResolutionOutcome,
    ) -> Result<i64, DomainError> {
        if !self.log_queries {
            debug!("Query history disabled, not recording");
            return Ok(0);
        }

        let entry = QueryHistoryEntry::from_outcome(outcome);
        let probes_json = serde_json::to_string(&outcome.probes).map_err(|e| {
            error!(error = %e, "Failed to serialize probe diagnostics");
            DomainError::DatabaseError(e.to_string())
        })?;

        // The switch may have been deleted while the query was in flight.
        let result = sqlx::query(
            "INSERT INTO query_history (target_ip, found_mac, switch_id, port_name, vlan_id,
                                        query_status, error_message, query_time_ms,
                                        probes_json, queried_at)
             VALUES (?, ?, (SELECT id FROM switches WHERE id = ?), ?, ?, ?, ?, ?, ?,
                     datetime(?))",
        )
        .bind(entry.target_ip.to_string())
        .bind(&entry.found_mac)
        .bind(entry.switch_id)
        .bind(&entry.port_name)
        .bind(entry.vlan_id.map(|v| v as i64))
        .bind(entry.query_status.as_str())
        .bind(&entry.error_message)
        .bind(entry.query_time_ms as i64)
        .bind(&probes_json)
        .bind(query.created_at.format("%Y-%m-%d %H:%M:%S").to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to record query history");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl QueryHistoryRepository for SqliteQueryHistoryRepository {
    #[instrument(skip(self))]
    async fn get_recent(
        &self,
        limit: u32,
        target_ip: Option<IpAddr>,
    ) -> Result<Vec<QueryHistoryEntry>, DomainError> {
        let rows = match target_ip {
            Some(ip) => {
                let query = format!(
                    "{} WHERE target_ip = ? ORDER BY queried_at DESC, id DESC LIMIT ?",
                    HISTORY_SELECT
                );
                sqlx::query_as::<_, HistoryRow>(&query)
                    .bind(ip.to_string())
                    .bind(limit as i64)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let query = format!("{} ORDER BY queried_at DESC, id DESC LIMIT ?", HISTORY_SELECT);
                sqlx::query_as::<_, HistoryRow>(&query)
                    .bind(limit as i64)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| {
            error!(error = %e, "Failed to fetch query history");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().filter_map(Self::row_to_entry).collect())
    }

    #[instrument(skip(self))]
    async fn delete_older_than(&self, days: u32) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM query_history WHERE queried_at < datetime('now', ?)")
            .bind(format!("-{} days", days))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete old query history");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }
}
