use crate::errors::DomainError;
use crate::switch::{NewSwitch, SwitchRole, Vendor};
use ipnetwork::IpNetwork;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr};

/// Upper bound on addresses one sweep may cover (a /20).
pub const MAX_SWEEP_HOSTS: usize = 4096;

const CORE_HINTS: &[&str] = &["core", "nexus", "6500", "6800", "9000", "catalyst 6"];
const AGGREGATION_HINTS: &[&str] = &[
    "aggregation",
    "agg",
    "distribution",
    "4500",
    "3850",
    "catalyst 4",
];

/// Login tried against every address of a sweep.
#[derive(Clone, PartialEq, Eq)]
pub struct DiscoveryCredential {
    pub username: String,
    pub password: String,
    pub enable_password: Option<String>,
    pub ssh_port: u16,
}

impl std::fmt::Debug for DiscoveryCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryCredential")
            .field("username", &self.username)
            .field("ssh_port", &self.ssh_port)
            .finish_non_exhaustive()
    }
}

/// A switch that answered a sweep, with the vendor and role inferred from
/// what it printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredSwitch {
    pub ip_address: IpAddr,
    pub name: String,
    pub vendor: Vendor,
    pub model: Option<String>,
    pub role: SwitchRole,
    pub priority: i32,
    pub ssh_port: u16,
    pub username: String,
}

impl DiscoveredSwitch {
    /// `dialect` is the vendor the session was opened as; the `show version`
    /// banner overrides it when it names a known vendor.
    pub fn from_device_output(
        ip_address: IpAddr,
        dialect: Vendor,
        version_output: &str,
        hostname_output: &str,
        credential: &DiscoveryCredential,
    ) -> Self {
        let vendor = detect_vendor(version_output).unwrap_or(dialect);
        let model = parse_model(version_output);
        let name = parse_hostname(hostname_output).unwrap_or_else(|| ip_address.to_string());
        let role = detect_role(model.as_deref().unwrap_or(""), &name);

        Self {
            ip_address,
            name,
            vendor,
            model,
            role,
            priority: default_priority(role),
            ssh_port: credential.ssh_port,
            username: credential.username.clone(),
        }
    }

    pub fn to_new_switch(&self, connection_timeout: u64) -> NewSwitch {
        NewSwitch {
            model: self.model.clone(),
            role: self.role,
            priority: self.priority,
            ssh_port: self.ssh_port,
            username: self.username.clone(),
            connection_timeout,
            ..NewSwitch::new(self.name.clone(), self.ip_address, self.vendor)
        }
    }
}

/// Expands `10.0.0.0/24`, `10.0.0.1-10.0.0.50`, `10.0.0.1-50` or a single
/// address. Network and broadcast addresses of a CIDR block are skipped.
pub fn parse_ip_range(range: &str) -> Result<Vec<IpAddr>, DomainError> {
    let range = range.trim();
    let invalid = |detail: String| DomainError::InvalidInput(format!("'{}': {}", range, detail));

    let hosts: Vec<Ipv4Addr> = if range.contains('/') {
        let network: IpNetwork = range.parse().map_err(|e| invalid(format!("{}", e)))?;
        let IpNetwork::V4(network) = network else {
            return Err(invalid("only IPv4 ranges can be swept".to_string()));
        };
        if network.size() as usize > MAX_SWEEP_HOSTS {
            return Err(invalid(format!("more than {} addresses", MAX_SWEEP_HOSTS)));
        }
        let skip_edges = network.prefix() < 31;
        network
            .iter()
            .filter(|ip| !skip_edges || (*ip != network.network() && *ip != network.broadcast()))
            .collect()
    } else if let Some((start, end)) = range.split_once('-') {
        let start: Ipv4Addr = start
            .trim()
            .parse()
            .map_err(|_| invalid("bad start address".to_string()))?;
        let end = end.trim();
        let end: Ipv4Addr = if end.contains('.') {
            end.parse().map_err(|_| invalid("bad end address".to_string()))?
        } else {
            let last: u8 = end.parse().map_err(|_| invalid("bad end octet".to_string()))?;
            let [a, b, c, _] = start.octets();
            Ipv4Addr::new(a, b, c, last)
        };

        let (from, to) = (u32::from(start), u32::from(end));
        if to < from {
            return Err(invalid("range ends before it starts".to_string()));
        }
        if (to - from) as usize >= MAX_SWEEP_HOSTS {
            return Err(invalid(format!("more than {} addresses", MAX_SWEEP_HOSTS)));
        }
        (from..=to).map(Ipv4Addr::from).collect()
    } else {
        let ip: IpAddr = range
            .parse()
            .map_err(|_| invalid("not an address, range or CIDR block".to_string()))?;
        return Ok(vec![ip]);
    };

    Ok(hosts.into_iter().map(IpAddr::V4).collect())
}

pub fn detect_vendor(version_output: &str) -> Option<Vendor> {
    let lowered = version_output.to_ascii_lowercase();
    let has_word = |word: &str| {
        lowered
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|token| token == word)
    };

    if has_word("cisco") || has_word("ios") {
        Some(Vendor::Cisco)
    } else if has_word("dell") {
        Some(Vendor::Dell)
    } else if has_word("alcatel") || has_word("nokia") {
        Some(Vendor::Alcatel)
    } else {
        None
    }
}

/// Core and aggregation are recognised from model or hostname keywords;
/// anything else is treated as access.
pub fn detect_role(model: &str, hostname: &str) -> SwitchRole {
    let model = model.to_ascii_lowercase();
    let hostname = hostname.to_ascii_lowercase();
    let mentions = |hints: &[&str]| {
        hints
            .iter()
            .any(|hint| model.contains(hint) || hostname.contains(hint))
    };

    if mentions(CORE_HINTS) {
        SwitchRole::Core
    } else if mentions(AGGREGATION_HINTS) {
        SwitchRole::Aggregation
    } else {
        SwitchRole::Access
    }
}

pub fn default_priority(role: SwitchRole) -> i32 {
    match role {
        SwitchRole::Core => 10,
        SwitchRole::Aggregation => 30,
        SwitchRole::Access => 50,
    }
}

/// Reads `hostname core-sw1` (IOS, OS10) or `Name: core-sw1,` (AOS).
pub fn parse_hostname(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let line = line.trim();
        let lowered = line.to_ascii_lowercase();
        let value = if lowered.starts_with("hostname ") {
            line.split_whitespace().nth(1)
        } else if lowered.starts_with("name:") {
            line[5..].split_whitespace().next()
        } else {
            None
        }?;
        let value = value.trim_matches(|c| c == ',' || c == '"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// First `show version` line that names a model.
pub fn parse_model(version_output: &str) -> Option<String> {
    version_output
        .lines()
        .map(str::trim)
        .find(|line| {
            let lowered = line.to_ascii_lowercase();
            lowered.contains("model") || lowered.contains("cisco")
        })
        .map(str::to_string)
}
