use crate::errors::DomainError;
use crate::resolution::{ResolutionOutcome, ResolutionStatus};
use serde::Serialize;
use std::net::IpAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    Success,
    NotFound,
    Error,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Success => "success",
            QueryStatus::NotFound => "not_found",
            QueryStatus::Error => "error",
        }
    }
}

impl FromStr for QueryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(QueryStatus::Success),
            "not_found" => Ok(QueryStatus::NotFound),
            "error" => Ok(QueryStatus::Error),
            other => Err(DomainError::DatabaseError(format!(
                "unknown query status '{}'",
                other
            ))),
        }
    }
}

/// One row of the lookup audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct QueryHistoryEntry {
    pub id: Option<i64>,
    pub target_ip: IpAddr,
    pub found_mac: Option<String>,
    pub switch_id: Option<i64>,
    pub port_name: Option<String>,
    pub vlan_id: Option<u16>,
    pub query_status: QueryStatus,
    pub error_message: Option<String>,
    pub query_time_ms: u64,
    pub queried_at: Option<String>,
}

impl QueryHistoryEntry {
    pub fn from_outcome(outcome: &ResolutionOutcome) -> Self {
        let (query_status, error_message) = match outcome.status {
            ResolutionStatus::Found => (QueryStatus::Success, None),
            ResolutionStatus::NotFound => (QueryStatus::NotFound, Some(outcome.message.clone())),
            ResolutionStatus::NoSwitches
            | ResolutionStatus::DeadlineExceeded
            | ResolutionStatus::InventoryUnavailable => {
                (QueryStatus::Error, Some(outcome.message.clone()))
            }
        };

        Self {
            id: None,
            target_ip: outcome.target_ip,
            found_mac: outcome.mac_address.map(|m| m.to_string()),
            switch_id: outcome.location.as_ref().map(|l| l.switch_id),
            port_name: outcome.location.as_ref().map(|l| l.port.clone()),
            vlan_id: outcome.location.as_ref().map(|l| l.vlan),
            query_status,
            error_message,
            query_time_ms: outcome.query_time_ms,
            queried_at: None,
        }
    }
}
