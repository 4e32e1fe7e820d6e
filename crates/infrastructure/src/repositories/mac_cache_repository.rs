use async_trait::async_trait;
use porttrace_application::ports::MacCacheRepository;
use porttrace_domain::{DomainError, MacAddress, MacCacheEntry};
use sqlx::SqlitePool;
use tracing::{error, instrument};

type MacCacheRow = (
    String,
    Option<String>,
    i64,
    String,
    Option<i64>,
    String,
    String,
);

pub struct SqliteMacCacheRepository {
    pool: SqlitePool,
}

impl SqliteMacCacheRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_entry(row: MacCacheRow) -> Option<MacCacheEntry> {
        let (mac, ip, switch_id, port_name, vlan_id, first_seen, last_seen) = row;
        Some(MacCacheEntry {
            mac_address: mac.parse().ok()?,
            ip_address: ip.and_then(|ip| ip.parse().ok()),
            switch_id,
            port_name,
            vlan_id: vlan_id.map(|v| v as u16),
            first_seen: Some(first_seen),
            last_seen: Some(last_seen),
        })
    }
}

#[async_trait]
impl MacCacheRepository for SqliteMacCacheRepository {
    #[instrument(skip(self))]
    async fn upsert(&self, entry: &MacCacheEntry) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO mac_address_cache (mac_address, ip_address, switch_id, port_name, vlan_id,
                                            first_seen, last_seen)
             VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
             ON CONFLICT(mac_address, switch_id, port_name) DO UPDATE SET
                 ip_address = excluded.ip_address,
                 vlan_id = excluded.vlan_id,
                 last_seen = CURRENT_TIMESTAMP",
        )
        .bind(entry.mac_address.to_string())
        .bind(entry.ip_address.map(|ip| ip.to_string()))
        .bind(entry.switch_id)
        .bind(&entry.port_name)
        .bind(entry.vlan_id.map(|v| v as i64))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to upsert MAC cache entry");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_mac(&self, mac: &MacAddress) -> Result<Vec<MacCacheEntry>, DomainError> {
        let rows = sqlx::query_as::<_, MacCacheRow>(
            "SELECT mac_address, ip_address, switch_id, port_name, vlan_id,
                    datetime(first_seen) as first_seen,
                    datetime(last_seen) as last_seen
             FROM mac_address_cache
             WHERE mac_address = ?
             ORDER BY last_seen DESC, id DESC",
        )
        .bind(mac.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query MAC cache");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().filter_map(Self::row_to_entry).collect())
    }
}
