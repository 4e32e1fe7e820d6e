use crate::errors::DomainError;
use crate::mac_address::MacAddress;
use crate::probe::SwitchProbeResult;
use crate::switch::Switch;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;

/// One caller request, with the candidate list frozen at acceptance time.
#[derive(Debug, Clone)]
pub struct ResolutionQuery {
    pub target: IpAddr,
    pub created_at: DateTime<Utc>,
    pub candidates: Arc<[Switch]>,
}

impl ResolutionQuery {
    pub fn new(target: IpAddr, candidates: Vec<Switch>) -> Self {
        Self {
            target,
            created_at: Utc::now(),
            candidates: Arc::from(candidates),
        }
    }
}

/// Lifecycle of a query: `Pending -> Probing -> {Resolved | Exhausted}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Pending,
    Probing,
    Resolved,
    Exhausted,
}

impl QueryState {
    pub fn can_transition_to(&self, next: QueryState) -> bool {
        matches!(
            (self, next),
            (QueryState::Pending, QueryState::Probing)
                | (QueryState::Pending, QueryState::Exhausted)
                | (QueryState::Probing, QueryState::Resolved)
                | (QueryState::Probing, QueryState::Exhausted)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Found,
    NotFound,
    NoSwitches,
    DeadlineExceeded,
    /// The switch inventory could not be read, so nothing was probed.
    InventoryUnavailable,
}

/// Where the target was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatedPort {
    pub switch_id: i64,
    pub switch_name: Arc<str>,
    pub switch_ip: IpAddr,
    pub port: String,
    pub vlan: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionOutcome {
    pub target_ip: IpAddr,
    pub found: bool,
    pub status: ResolutionStatus,
    pub mac_address: Option<MacAddress>,
    pub location: Option<LocatedPort>,
    pub message: String,
    pub query_time_ms: u64,
    pub probes: Vec<SwitchProbeResult>,
}

impl ResolutionOutcome {
    pub fn found(
        target_ip: IpAddr,
        mac: MacAddress,
        location: LocatedPort,
        query_time_ms: u64,
        probes: Vec<SwitchProbeResult>,
    ) -> Self {
        Self {
            target_ip,
            found: true,
            status: ResolutionStatus::Found,
            mac_address: Some(mac),
            location: Some(location),
            message: "Device successfully located".to_string(),
            query_time_ms,
            probes,
        }
    }

    /// A miss. `mac` is set when an ARP entry existed but no forwarding
    /// table knew the port.
    pub fn not_found(
        target_ip: IpAddr,
        status: ResolutionStatus,
        mac: Option<MacAddress>,
        query_time_ms: u64,
        probes: Vec<SwitchProbeResult>,
    ) -> Self {
        let message = match (status, mac) {
            (ResolutionStatus::NoSwitches, _) => "No enabled switches configured",
            (ResolutionStatus::DeadlineExceeded, _) => "Query deadline exceeded before a match was found",
            (ResolutionStatus::InventoryUnavailable, _) => "Switch inventory unavailable",
            (_, Some(_)) => "MAC address not found in any switch MAC table",
            (_, None) => "No ARP entry found for this IP address",
        };
        Self {
            target_ip,
            found: false,
            status,
            mac_address: mac,
            location: None,
            message: message.to_string(),
            query_time_ms,
            probes,
        }
    }

    /// A query that never reached a switch because listing them failed.
    pub fn inventory_unavailable(
        target_ip: IpAddr,
        error: &DomainError,
        query_time_ms: u64,
    ) -> Self {
        let mut outcome = Self::not_found(
            target_ip,
            ResolutionStatus::InventoryUnavailable,
            None,
            query_time_ms,
            Vec::new(),
        );
        outcome.message = format!("Switch inventory unavailable: {}", error);
        outcome
    }

    pub fn switch_id(&self) -> Option<i64> {
        self.location.as_ref().map(|l| l.switch_id)
    }
}
