#![allow(dead_code)]
#![allow(unused_imports)]
pub mod mock_repositories;
pub mod mock_sessions;

pub use mock_repositories::*;
pub use mock_sessions::*;

use porttrace_domain::{Switch, SwitchRole, Vendor};
use std::net::IpAddr;
use std::sync::Arc;

pub fn make_switch(id: i64, role: SwitchRole, priority: i32, vendor: Vendor) -> Switch {
    Switch {
        id,
        name: Arc::from(format!("sw-{}", id)),
        ip_address: IpAddr::from([10, 255, 0, id as u8]),
        vendor,
        model: None,
        role,
        priority,
        ssh_port: 22,
        username: "admin".to_string(),
        connection_timeout: 5,
        enabled: true,
        is_reachable: None,
        last_check_at: None,
        response_time_ms: None,
    }
}

pub fn cisco_arp(ip: &str, mac_dotted: &str) -> String {
    format!(
        "Protocol  Address          Age (min)  Hardware Addr   Type   Interface\n\
         Internet  {}              5   {}  ARPA   Vlan100\n",
        ip, mac_dotted
    )
}

pub fn cisco_mac_table(mac_dotted: &str, port: &str, vlan: u16) -> String {
    format!(
        "          Mac Address Table\n\
         -------------------------------------------\n\n\
         Vlan    Mac Address       Type        Ports\n\
         ----    -----------       --------    -----\n\
         {:>4}    {}    DYNAMIC     {}\n\
         Total Mac Addresses for this criterion: 1\n",
        vlan, mac_dotted, port
    )
}

pub fn dell_mac_table(mac: &str, port: &str, vlan: u16) -> String {
    format!("{}        {}     dynamic     {}\n", vlan, mac, port)
}
