#![allow(dead_code)]

use async_trait::async_trait;
use porttrace_application::ports::{QueryHistoryRepository, ReachabilityChecker, SwitchRepository};
use porttrace_domain::{
    DomainError, NewSwitch, QueryHistoryEntry, Reachability, Switch, SwitchCredential,
    SwitchRole, Vendor,
};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub fn make_switch(id: i64) -> Switch {
    Switch {
        id,
        name: Arc::from(format!("sw-{}", id).as_str()),
        ip_address: format!("10.255.0.{}", id).parse().unwrap(),
        vendor: Vendor::Cisco,
        model: None,
        role: SwitchRole::Access,
        priority: 50,
        ssh_port: 22,
        username: "admin".to_string(),
        connection_timeout: 5,
        enabled: true,
        is_reachable: None,
        last_check_at: None,
        response_time_ms: None,
    }
}

pub struct MockSwitchRepository {
    switches: Arc<RwLock<Vec<Switch>>>,
    reachability: Arc<RwLock<HashMap<i64, Reachability>>>,
}

impl MockSwitchRepository {
    pub fn with_switches(switches: Vec<Switch>) -> Self {
        Self {
            switches: Arc::new(RwLock::new(switches)),
            reachability: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn reachability_of(&self, id: i64) -> Option<Reachability> {
        self.reachability.read().await.get(&id).copied()
    }
}

#[async_trait]
impl SwitchRepository for MockSwitchRepository {
    async fn get_all(&self) -> Result<Vec<Switch>, DomainError> {
        Ok(self.switches.read().await.clone())
    }

    async fn list_enabled(&self) -> Result<Vec<Switch>, DomainError> {
        Ok(self
            .switches
            .read()
            .await
            .iter()
            .filter(|s| s.enabled)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Switch>, DomainError> {
        Ok(self.switches.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn get_by_ip(&self, ip_address: IpAddr) -> Result<Option<Switch>, DomainError> {
        Ok(self
            .switches
            .read()
            .await
            .iter()
            .find(|s| s.ip_address == ip_address)
            .cloned())
    }

    async fn create(
        &self,
        _switch: NewSwitch,
        _credential: SwitchCredential,
    ) -> Result<Switch, DomainError> {
        Err(DomainError::DatabaseError("read-only mock".to_string()))
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        Err(DomainError::SwitchNotFound(id))
    }

    async fn set_enabled(&self, id: i64, _enabled: bool) -> Result<Switch, DomainError> {
        Err(DomainError::SwitchNotFound(id))
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

pub struct MockReachabilityChecker {
    call_count: Arc<AtomicU64>,
}

impl MockReachabilityChecker {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ReachabilityChecker for MockReachabilityChecker {
    async fn check(&self, switch: &Switch, _timeout: Duration) -> Reachability {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Reachability {
            reachable: switch.id % 2 == 1,
            response_time_ms: (switch.id % 2 == 1).then_some(3),
        }
    }
}

/// History rows are represented only by their age in days.
pub struct MockQueryHistoryRepository {
    ages: Arc<RwLock<Vec<u32>>>,
    cleanup_calls: Arc<AtomicU64>,
    should_fail: Arc<RwLock<bool>>,
}

impl MockQueryHistoryRepository {
    pub fn new() -> Self {
        Self {
            ages: Arc::new(RwLock::new(Vec::new())),
            cleanup_calls: Arc::new(AtomicU64::new(0)),
            should_fail: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn add_row_aged(&self, days: u32) {
        self.ages.write().await.push(days);
    }

    pub async fn count(&self) -> usize {
        self.ages.read().await.len()
    }

    pub async fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().await = fail;
    }

    pub fn cleanup_calls(&self) -> u64 {
        self.cleanup_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QueryHistoryRepository for MockQueryHistoryRepository {
    async fn get_recent(
        &self,
        _limit: u32,
        _target_ip: Option<IpAddr>,
    ) -> Result<Vec<QueryHistoryEntry>, DomainError> {
        Ok(Vec::new())
    }

    async fn delete_older_than(&self, days: u32) -> Result<u64, DomainError> {
        self.cleanup_calls.fetch_add(1, Ordering::Relaxed);
        if *self.should_fail.read().await {
            return Err(DomainError::DatabaseError("disk I/O error".to_string()));
        }
        let mut ages = self.ages.write().await;
        let before = ages.len();
        ages.retain(|age| *age <= days);
        Ok((before - ages.len()) as u64)
    }
}
