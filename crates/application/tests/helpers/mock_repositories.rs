#![allow(dead_code)]

use async_trait::async_trait;
use porttrace_application::ports::{
    AuditRecorder, CredentialStore, MacCacheRepository, QueryHistoryRepository,
    ReachabilityChecker, SwitchRepository,
};
use porttrace_domain::{
    DomainError, MacAddress, MacCacheEntry, NewSwitch, QueryHistoryEntry, Reachability,
    ResolutionOutcome, ResolutionQuery, Switch, SwitchCredential,
};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MockSwitchRepository {
    switches: Arc<RwLock<HashMap<i64, (Switch, SwitchCredential)>>>,
    next_id: Arc<AtomicI64>,
    missing_credentials: Arc<RwLock<Vec<i64>>>,
    reachability: Arc<RwLock<HashMap<i64, Reachability>>>,
    listing_fails: Arc<AtomicBool>,
}

impl MockSwitchRepository {
    pub fn new() -> Self {
        Self {
            switches: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            missing_credentials: Arc::new(RwLock::new(Vec::new())),
            reachability: Arc::new(RwLock::new(HashMap::new())),
            listing_fails: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_listing(&self) {
        self.listing_fails.store(true, Ordering::SeqCst);
    }

    pub async fn with_switches(switches: Vec<Switch>) -> Self {
        let repo = Self::new();
        for switch in switches {
            repo.add_switch(switch).await;
        }
        repo
    }

    pub async fn add_switch(&self, switch: Switch) {
        self.next_id.fetch_max(switch.id + 1, Ordering::SeqCst);
        self.switches
            .write()
            .await
            .insert(switch.id, (switch, SwitchCredential::new("secret")));
    }

    pub async fn drop_credential(&self, id: i64) {
        self.missing_credentials.write().await.push(id);
    }

    pub async fn reachability_of(&self, id: i64) -> Option<Reachability> {
        self.reachability.read().await.get(&id).copied()
    }

    pub async fn count(&self) -> usize {
        self.switches.read().await.len()
    }

    pub async fn list_enabled_ids(&self) -> Vec<i64> {
        self.switches
            .read()
            .await
            .values()
            .filter(|(s, _)| s.enabled)
            .map(|(s, _)| s.id)
            .collect()
    }
}

impl Default for MockSwitchRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SwitchRepository for MockSwitchRepository {
    async fn get_all(&self) -> Result<Vec<Switch>, DomainError> {
        let mut all: Vec<Switch> = self
            .switches
            .read()
            .await
            .values()
            .map(|(s, _)| s.clone())
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn list_enabled(&self) -> Result<Vec<Switch>, DomainError> {
        if self.listing_fails.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("database is locked".to_string()));
        }
        // Reverse id order so the use case has to sort.
        let mut enabled: Vec<Switch> = self
            .switches
            .read()
            .await
            .values()
            .filter(|(s, _)| s.enabled)
            .map(|(s, _)| s.clone())
            .collect();
        enabled.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(enabled)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Switch>, DomainError> {
        Ok(self.switches.read().await.get(&id).map(|(s, _)| s.clone()))
    }

    async fn get_by_ip(&self, ip_address: IpAddr) -> Result<Option<Switch>, DomainError> {
        Ok(self
            .switches
            .read()
            .await
            .values()
            .find(|(s, _)| s.ip_address == ip_address)
            .map(|(s, _)| s.clone()))
    }

    async fn create(
        &self,
        switch: NewSwitch,
        credential: SwitchCredential,
    ) -> Result<Switch, DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Switch {
            id,
            name: Arc::from(switch.name.as_str()),
            ip_address: switch.ip_address,
            vendor: switch.vendor,
            model: switch.model,
            role: switch.role,
            priority: switch.priority,
            ssh_port: switch.ssh_port,
            username: switch.username,
            connection_timeout: switch.connection_timeout,
            enabled: switch.enabled,
            is_reachable: None,
            last_check_at: None,
            response_time_ms: None,
        };
        self.switches
            .write()
            .await
            .insert(id, (created.clone(), credential));
        Ok(created)
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.switches
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::SwitchNotFound(id))
    }

    async fn set_enabled(&self, id: i64, enabled: bool) -> Result<Switch, DomainError> {
        let mut switches = self.switches.write().await;
        let (switch, _) = switches.get_mut(&id).ok_or(DomainError::SwitchNotFound(id))?;
        switch.enabled = enabled;
        Ok(switch.clone())
    }

    async fn update_reachability(
        &self,
        id: i64,
        reachability: Reachability,
    ) -> Result<(), DomainError> {
        self.reachability.write().await.insert(id, reachability);
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MockSwitchRepository {
    async fn get_credential(&self, switch_id: i64) -> Result<SwitchCredential, DomainError> {
        if self.missing_credentials.read().await.contains(&switch_id) {
            return Err(DomainError::CredentialError(format!(
                "no credential stored for switch {}",
                switch_id
            )));
        }
        self.switches
            .read()
            .await
            .get(&switch_id)
            .map(|(_, c)| c.clone())
            .ok_or(DomainError::SwitchNotFound(switch_id))
    }
}

#[derive(Clone)]
pub struct MockAuditRecorder {
    recorded: Arc<RwLock<Vec<ResolutionOutcome>>>,
    should_fail: Arc<AtomicBool>,
    delay: Option<Duration>,
}

impl MockAuditRecorder {
    pub fn new() -> Self {
        Self {
            recorded: Arc::new(RwLock::new(Vec::new())),
            should_fail: Arc::new(AtomicBool::new(false)),
            delay: None,
        }
    }

    /// A recorder whose every write takes `delay`.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        let recorder = Self::new();
        recorder.should_fail.store(true, Ordering::SeqCst);
        recorder
    }

    pub async fn recorded(&self) -> Vec<ResolutionOutcome> {
        self.recorded.read().await.clone()
    }
}

impl Default for MockAuditRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditRecorder for MockAuditRecorder {
    async fn record(
        &self,
        _query: &ResolutionQuery,
        outcome: &ResolutionOutcome,
    ) -> Result<i64, DomainError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("disk full".to_string()));
        }
        let mut recorded = self.recorded.write().await;
        recorded.push(outcome.clone());
        Ok(recorded.len() as i64)
    }
}

#[derive(Clone, Default)]
pub struct MockMacCacheRepository {
    entries: Arc<RwLock<Vec<MacCacheEntry>>>,
}

impl MockMacCacheRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<MacCacheEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl MacCacheRepository for MockMacCacheRepository {
    async fn upsert(&self, entry: &MacCacheEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.retain(|e| {
            !(e.mac_address == entry.mac_address
                && e.switch_id == entry.switch_id
                && e.port_name == entry.port_name)
        });
        entries.push(entry.clone());
        Ok(())
    }

    async fn find_by_mac(&self, mac: &MacAddress) -> Result<Vec<MacCacheEntry>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| &e.mac_address == mac)
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MockQueryHistoryRepository {
    entries: Arc<RwLock<Vec<QueryHistoryEntry>>>,
    last_limit: Arc<RwLock<Option<u32>>>,
    last_retention: Arc<RwLock<Option<u32>>>,
}

impl MockQueryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, entry: QueryHistoryEntry) {
        self.entries.write().await.push(entry);
    }

    pub async fn last_limit(&self) -> Option<u32> {
        *self.last_limit.read().await
    }

    pub async fn last_retention(&self) -> Option<u32> {
        *self.last_retention.read().await
    }
}

#[async_trait]
impl QueryHistoryRepository for MockQueryHistoryRepository {
    async fn get_recent(
        &self,
        limit: u32,
        target_ip: Option<IpAddr>,
    ) -> Result<Vec<QueryHistoryEntry>, DomainError> {
        *self.last_limit.write().await = Some(limit);
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .rev()
            .filter(|e| target_ip.map_or(true, |ip| e.target_ip == ip))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn delete_older_than(&self, days: u32) -> Result<u64, DomainError> {
        *self.last_retention.write().await = Some(days);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.clear();
        Ok(before as u64)
    }
}

#[derive(Clone, Default)]
pub struct MockReachabilityChecker {
    reachable: Arc<RwLock<HashMap<IpAddr, u64>>>,
}

impl MockReachabilityChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_reachable(&self, ip: IpAddr, response_time_ms: u64) {
        self.reachable.write().await.insert(ip, response_time_ms);
    }
}

#[async_trait]
impl ReachabilityChecker for MockReachabilityChecker {
    async fn check(&self, switch: &Switch, _timeout: Duration) -> Reachability {
        match self.reachable.read().await.get(&switch.ip_address) {
            Some(ms) => Reachability {
                reachable: true,
                response_time_ms: Some(*ms),
            },
            None => Reachability {
                reachable: false,
                response_time_ms: None,
            },
        }
    }
}
