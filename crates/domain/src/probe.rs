use crate::errors::DomainError;
use crate::mac_address::MacAddress;
use crate::switch::Switch;
use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;

/// Interface name prefixes that denote uplinks, aggregates or logical
/// interfaces rather than a physical edge port.
const NON_EDGE_PORT_PREFIXES: &[&str] = &[
    "port-channel",
    "po",
    "lag",
    "bundle",
    "ae",
    "vlan",
    "vl",
    "cpu",
    "router",
    "switch",
    "sup-eth",
    "tunnel",
    "nve",
    "vxlan",
];

/// One forwarding-table row for a MAC address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortBinding {
    pub port: String,
    pub vlan: u16,
    pub entry_type: Option<String>,
}

impl PortBinding {
    pub fn new(port: impl Into<String>, vlan: u16) -> Self {
        Self {
            port: port.into(),
            vlan,
            entry_type: None,
        }
    }

    pub fn with_entry_type(mut self, entry_type: impl Into<String>) -> Self {
        self.entry_type = Some(entry_type.into());
        self
    }

    /// Whether the row points at a physical access port.
    pub fn is_edge_port(&self) -> bool {
        let port = self.port.to_ascii_lowercase();
        !NON_EDGE_PORT_PREFIXES
            .iter()
            .any(|prefix| port.starts_with(prefix))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    Hit,
    Miss,
    Error,
    Timeout,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeErrorKind {
    SwitchUnreachable,
    SwitchAuthFailed,
    SwitchTimeout,
    SwitchParseError,
    QueryDeadlineExceeded,
}

impl ProbeErrorKind {
    pub fn from_error(error: &DomainError) -> Self {
        match error {
            DomainError::SwitchAuthFailed { .. } | DomainError::CredentialError(_) => {
                ProbeErrorKind::SwitchAuthFailed
            }
            DomainError::SwitchTimeout { .. } => ProbeErrorKind::SwitchTimeout,
            DomainError::SwitchParseError { .. } => ProbeErrorKind::SwitchParseError,
            DomainError::QueryDeadlineExceeded(_) => ProbeErrorKind::QueryDeadlineExceeded,
            _ => ProbeErrorKind::SwitchUnreachable,
        }
    }

    fn outcome(&self) -> ProbeOutcome {
        match self {
            ProbeErrorKind::SwitchTimeout | ProbeErrorKind::QueryDeadlineExceeded => {
                ProbeOutcome::Timeout
            }
            _ => ProbeOutcome::Error,
        }
    }
}

/// Whether a probe ran the full ARP + forwarding lookup or only consulted the
/// forwarding table for an already-known MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbePhase {
    Full,
    ForwardingOnly,
}

/// Diagnostics for one switch queried during a resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchProbeResult {
    pub switch_id: i64,
    pub switch_name: Arc<str>,
    pub switch_ip: IpAddr,
    pub outcome: ProbeOutcome,
    pub phase: ProbePhase,
    pub mac_address: Option<MacAddress>,
    pub port: Option<String>,
    pub vlan: Option<u16>,
    pub elapsed_ms: u64,
    pub error_kind: Option<ProbeErrorKind>,
    pub error: Option<String>,
    pub ambiguous: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<PortBinding>,
}

impl SwitchProbeResult {
    fn base(switch: &Switch, outcome: ProbeOutcome, phase: ProbePhase, elapsed_ms: u64) -> Self {
        Self {
            switch_id: switch.id,
            switch_name: Arc::clone(&switch.name),
            switch_ip: switch.ip_address,
            outcome,
            phase,
            mac_address: None,
            port: None,
            vlan: None,
            elapsed_ms,
            error_kind: None,
            error: None,
            ambiguous: false,
            candidates: Vec::new(),
        }
    }

    pub fn hit(
        switch: &Switch,
        phase: ProbePhase,
        mac: MacAddress,
        selection: BindingSelection,
        elapsed_ms: u64,
    ) -> Self {
        let mut result = Self::base(switch, ProbeOutcome::Hit, phase, elapsed_ms);
        result.mac_address = Some(mac);
        result.port = Some(selection.chosen.port.clone());
        result.vlan = Some(selection.chosen.vlan);
        result.ambiguous = selection.ambiguous;
        if selection.ambiguous {
            result.candidates = selection.candidates;
        }
        result
    }

    /// A miss may still carry the MAC learned from the ARP table.
    pub fn miss(switch: &Switch, phase: ProbePhase, mac: Option<MacAddress>, elapsed_ms: u64) -> Self {
        let mut result = Self::base(switch, ProbeOutcome::Miss, phase, elapsed_ms);
        result.mac_address = mac;
        result
    }

    pub fn failed(
        switch: &Switch,
        phase: ProbePhase,
        mac: Option<MacAddress>,
        error: &DomainError,
        elapsed_ms: u64,
    ) -> Self {
        let kind = ProbeErrorKind::from_error(error);
        let mut result = Self::base(switch, kind.outcome(), phase, elapsed_ms);
        result.mac_address = mac;
        result.error_kind = Some(kind);
        result.error = Some(error.to_string());
        result
    }

    pub fn cancelled(switch: &Switch, phase: ProbePhase, elapsed_ms: u64) -> Self {
        Self::base(switch, ProbeOutcome::Cancelled, phase, elapsed_ms)
    }

    pub fn is_hit(&self) -> bool {
        self.outcome == ProbeOutcome::Hit
    }

    /// The switch answered, whatever the answer was.
    pub fn was_reachable(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Hit | ProbeOutcome::Miss)
            || self.error_kind == Some(ProbeErrorKind::SwitchParseError)
    }
}

/// The binding picked from a forwarding lookup, plus the rows it was picked from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSelection {
    pub chosen: PortBinding,
    pub ambiguous: bool,
    pub candidates: Vec<PortBinding>,
}

impl BindingSelection {
    /// Prefers edge ports over uplinks and logical interfaces; among several
    /// equally good rows the first in device order wins and the choice is
    /// flagged as ambiguous.
    pub fn choose(bindings: Vec<PortBinding>) -> Option<Self> {
        let edge: Vec<&PortBinding> = bindings.iter().filter(|b| b.is_edge_port()).collect();
        let pool: Vec<&PortBinding> = if edge.is_empty() {
            bindings.iter().collect()
        } else {
            edge
        };

        let chosen = (*pool.first()?).clone();
        let ambiguous = pool
            .iter()
            .any(|b| b.port != chosen.port || b.vlan != chosen.vlan);

        Some(Self {
            chosen,
            ambiguous,
            candidates: bindings,
        })
    }
}
