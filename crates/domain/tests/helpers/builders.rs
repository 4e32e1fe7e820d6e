#![allow(dead_code)]
use porttrace_domain::{Switch, SwitchRole, Vendor};
use std::net::IpAddr;
use std::sync::Arc;

pub struct SwitchBuilder {
    id: i64,
    name: Arc<str>,
    ip_address: IpAddr,
    vendor: Vendor,
    role: SwitchRole,
    priority: i32,
    connection_timeout: u64,
    enabled: bool,
}

impl SwitchBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: format!("sw-{}", id).into(),
            ip_address: IpAddr::from([10, 255, 0, id as u8]),
            vendor: Vendor::Cisco,
            role: SwitchRole::Access,
            priority: 50,
            connection_timeout: 30,
            enabled: true,
        }
    }

    pub fn vendor(mut self, vendor: Vendor) -> Self {
        self.vendor = vendor;
        self
    }

    pub fn role(mut self, role: SwitchRole) -> Self {
        self.role = role;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn build(self) -> Switch {
        Switch {
            id: self.id,
            name: self.name,
            ip_address: self.ip_address,
            vendor: self.vendor,
            model: None,
            role: self.role,
            priority: self.priority,
            ssh_port: 22,
            username: "admin".to_string(),
            connection_timeout: self.connection_timeout,
            enabled: self.enabled,
            is_reachable: None,
            last_check_at: None,
            response_time_ms: None,
        }
    }
}
