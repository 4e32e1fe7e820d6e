//! Vendor command dialects.
//!
//! Each supported switch family knows how to phrase the two lookups the
//! resolver needs (IP to MAC through the ARP/neighbor table, MAC to port
//! through the forwarding table) and how to read the answers back. Callers go
//! through [`VendorAdapter`] and never branch on the vendor themselves.

mod alcatel;
mod cisco;
mod dell;
mod table;

pub use alcatel::AlcatelAos;
pub use cisco::CiscoIos;
pub use dell::DellOs;
pub use table::{ArpLayout, MacTableLayout, ParseError};

use crate::mac_address::MacAddress;
use crate::probe::PortBinding;
use crate::switch::Vendor;
use std::net::IpAddr;

/// A logical question asked of a switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOperation {
    /// IP to MAC via the ARP (IPv4) or neighbor (IPv6) table.
    ArpLookup(IpAddr),
    /// MAC to port and VLAN via the forwarding table.
    MacTableLookup(MacAddress),
    /// Any harmless command proving the session works.
    ConnectionTest,
}

/// What a parsed command output contributed to the resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionFragment {
    ArpEntry(Option<MacAddress>),
    ForwardingEntries(Vec<PortBinding>),
    DeviceResponded { output_len: usize },
}

/// Capability set every vendor dialect provides.
pub trait VendorDialect: Send + Sync {
    fn arp_lookup_command(&self, target: IpAddr) -> String;

    fn mac_table_lookup_command(&self, mac: &MacAddress) -> String;

    fn connection_test_command(&self) -> &'static str {
        "show version"
    }

    /// Prints the configured hostname; used when onboarding a switch.
    fn hostname_command(&self) -> &'static str {
        "show running-config | include hostname"
    }

    /// Command that raises the session to privileged mode, for platforms that
    /// restrict the lookups to it.
    fn enable_command(&self) -> Option<&'static str> {
        None
    }

    /// Turns off `--More--` pagination on an interactive shell.
    fn disable_paging_command(&self) -> Option<&'static str> {
        None
    }

    fn arp_layout(&self) -> ArpLayout;

    fn mac_table_layout(&self) -> MacTableLayout;

    fn parse_arp(&self, raw: &str, target: IpAddr) -> Result<Option<MacAddress>, ParseError> {
        table::parse_arp(raw, target, self.arp_layout())
    }

    fn parse_mac_table(&self, raw: &str, mac: &MacAddress) -> Result<Vec<PortBinding>, ParseError> {
        table::parse_mac_table(raw, mac, self.mac_table_layout())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum VendorAdapter {
    Cisco(CiscoIos),
    Dell(DellOs),
    Alcatel(AlcatelAos),
}

impl VendorAdapter {
    pub fn for_vendor(vendor: Vendor) -> Self {
        match vendor {
            Vendor::Cisco => Self::Cisco(CiscoIos),
            Vendor::Dell => Self::Dell(DellOs),
            Vendor::Alcatel => Self::Alcatel(AlcatelAos),
        }
    }

    fn dialect(&self) -> &dyn VendorDialect {
        match self {
            Self::Cisco(d) => d,
            Self::Dell(d) => d,
            Self::Alcatel(d) => d,
        }
    }

    pub fn enable_command(&self) -> Option<&'static str> {
        self.dialect().enable_command()
    }

    pub fn hostname_command(&self) -> &'static str {
        self.dialect().hostname_command()
    }

    pub fn version_command(&self) -> &'static str {
        self.dialect().connection_test_command()
    }

    pub fn disable_paging_command(&self) -> Option<&'static str> {
        self.dialect().disable_paging_command()
    }

    pub fn commands_for(&self, operation: &LookupOperation) -> Vec<String> {
        let dialect = self.dialect();
        match operation {
            LookupOperation::ArpLookup(ip) => vec![dialect.arp_lookup_command(*ip)],
            LookupOperation::MacTableLookup(mac) => vec![dialect.mac_table_lookup_command(mac)],
            LookupOperation::ConnectionTest => {
                vec![dialect.connection_test_command().to_string()]
            }
        }
    }

    pub fn parse(
        &self,
        operation: &LookupOperation,
        raw: &str,
    ) -> Result<ResolutionFragment, ParseError> {
        let dialect = self.dialect();
        match operation {
            LookupOperation::ArpLookup(ip) => {
                dialect.parse_arp(raw, *ip).map(ResolutionFragment::ArpEntry)
            }
            LookupOperation::MacTableLookup(mac) => dialect
                .parse_mac_table(raw, mac)
                .map(ResolutionFragment::ForwardingEntries),
            LookupOperation::ConnectionTest => {
                table::check_rejected(raw)?;
                Ok(ResolutionFragment::DeviceResponded {
                    output_len: raw.len(),
                })
            }
        }
    }
}
