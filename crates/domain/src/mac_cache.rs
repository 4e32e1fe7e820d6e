use crate::mac_address::MacAddress;
use crate::resolution::ResolutionOutcome;
use serde::Serialize;
use std::net::IpAddr;

/// Last known port of a MAC address on one switch.
#[derive(Debug, Clone, Serialize)]
pub struct MacCacheEntry {
    pub mac_address: MacAddress,
    pub ip_address: Option<IpAddr>,
    pub switch_id: i64,
    pub port_name: String,
    pub vlan_id: Option<u16>,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
}

impl MacCacheEntry {
    /// Builds the cache row for a successful resolution; `None` for misses.
    pub fn from_outcome(outcome: &ResolutionOutcome) -> Option<Self> {
        let location = outcome.location.as_ref()?;
        Some(Self {
            mac_address: outcome.mac_address?,
            ip_address: Some(outcome.target_ip),
            switch_id: location.switch_id,
            port_name: location.port.clone(),
            vlan_id: Some(location.vlan),
            first_seen: None,
            last_seen: None,
        })
    }
}
