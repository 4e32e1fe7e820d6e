use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

pub const MIN_PRIORITY: i32 = 1;
pub const MAX_PRIORITY: i32 = 100;
pub const DEFAULT_PRIORITY: i32 = 50;
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
pub const MAX_CONNECTION_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Cisco,
    Dell,
    Alcatel,
}

impl Vendor {
    pub const ALL: [Vendor; 3] = [Vendor::Cisco, Vendor::Dell, Vendor::Alcatel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Cisco => "cisco",
            Vendor::Dell => "dell",
            Vendor::Alcatel => "alcatel",
        }
    }
}

impl FromStr for Vendor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cisco" => Ok(Vendor::Cisco),
            "dell" => Ok(Vendor::Dell),
            "alcatel" => Ok(Vendor::Alcatel),
            other => Err(DomainError::InvalidSwitch(format!(
                "unsupported vendor '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Network tier of a switch. Core devices usually hold the authoritative
/// ARP state, so they are searched first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchRole {
    Core,
    Aggregation,
    Access,
}

impl SwitchRole {
    pub fn rank(&self) -> u8 {
        match self {
            SwitchRole::Core => 0,
            SwitchRole::Aggregation => 1,
            SwitchRole::Access => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwitchRole::Core => "core",
            SwitchRole::Aggregation => "aggregation",
            SwitchRole::Access => "access",
        }
    }
}

impl FromStr for SwitchRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "core" => Ok(SwitchRole::Core),
            "aggregation" => Ok(SwitchRole::Aggregation),
            "access" => Ok(SwitchRole::Access),
            other => Err(DomainError::InvalidSwitch(format!("unknown role '{}'", other))),
        }
    }
}

impl fmt::Display for SwitchRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A managed switch as stored in the inventory.
#[derive(Debug, Clone, Serialize)]
pub struct Switch {
    pub id: i64,
    pub name: Arc<str>,
    pub ip_address: IpAddr,
    pub vendor: Vendor,
    pub model: Option<String>,
    pub role: SwitchRole,
    pub priority: i32,
    pub ssh_port: u16,
    pub username: String,
    pub connection_timeout: u64,
    pub enabled: bool,
    pub is_reachable: Option<bool>,
    pub last_check_at: Option<String>,
    pub response_time_ms: Option<u64>,
}

impl Switch {
    /// Search order: role tier, then priority, then id for determinism.
    pub fn order_key(&self) -> (u8, i32, i64) {
        (self.role.rank(), self.priority, self.id)
    }
}

/// Sorts switches into probe order in place.
pub fn sort_by_search_order(switches: &mut [Switch]) {
    switches.sort_by_key(Switch::order_key);
}

/// Switch definition before it has been persisted.
#[derive(Debug, Clone)]
pub struct NewSwitch {
    pub name: String,
    pub ip_address: IpAddr,
    pub vendor: Vendor,
    pub model: Option<String>,
    pub role: SwitchRole,
    pub priority: i32,
    pub ssh_port: u16,
    pub username: String,
    pub connection_timeout: u64,
    pub enabled: bool,
}

impl NewSwitch {
    pub fn new(name: impl Into<String>, ip_address: IpAddr, vendor: Vendor) -> Self {
        Self {
            name: name.into(),
            ip_address,
            vendor,
            model: None,
            role: SwitchRole::Access,
            priority: DEFAULT_PRIORITY,
            ssh_port: DEFAULT_SSH_PORT,
            username: String::new(),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT_SECS,
            enabled: true,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let name = self.name.trim();
        if name.is_empty() || name.len() > 100 {
            return Err(DomainError::InvalidSwitch(
                "name must be 1-100 characters".to_string(),
            ));
        }
        if self.username.trim().is_empty() {
            return Err(DomainError::InvalidSwitch("username is required".to_string()));
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(DomainError::InvalidSwitch(format!(
                "priority must be between {} and {}",
                MIN_PRIORITY, MAX_PRIORITY
            )));
        }
        if self.ssh_port == 0 {
            return Err(DomainError::InvalidSwitch("ssh_port cannot be 0".to_string()));
        }
        if self.connection_timeout == 0 || self.connection_timeout > MAX_CONNECTION_TIMEOUT_SECS {
            return Err(DomainError::InvalidSwitch(format!(
                "connection_timeout must be between 1 and {} seconds",
                MAX_CONNECTION_TIMEOUT_SECS
            )));
        }
        Ok(())
    }
}

/// Login secrets for one switch. Never logged: `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SwitchCredential {
    pub password: String,
    pub enable_password: Option<String>,
}

impl SwitchCredential {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            enable_password: None,
        }
    }

    pub fn with_enable_password(mut self, enable_password: impl Into<String>) -> Self {
        self.enable_password = Some(enable_password.into());
        self
    }
}

impl fmt::Debug for SwitchCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchCredential")
            .field("password", &"<redacted>")
            .field(
                "enable_password",
                &self.enable_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Result of one reachability check against a switch's management port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reachability {
    pub reachable: bool,
    pub response_time_ms: Option<u64>,
}
