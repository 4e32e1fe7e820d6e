use porttrace_domain::Switch;
use std::sync::Arc;
use tracing::warn;

pub(crate) type SwitchRow = (
    i64,
    String,
    String,
    String,
    Option<String>,
    String,
    i64,
    i64,
    String,
    i64,
    i64,
    Option<i64>,
    Option<String>,
    Option<i64>,
);

pub(crate) const SWITCH_SELECT: &str = "SELECT id, name, ip_address, vendor, model, role,
            priority, ssh_port, username, connection_timeout, enabled,
            is_reachable,
            datetime(last_check_at) as last_check_at,
            response_time_ms
     FROM switches";

/// Rows with an unparseable IP, vendor or role are skipped with a warning
/// rather than failing the whole listing.
pub(crate) fn row_to_switch(row: SwitchRow) -> Option<Switch> {
    let (
        id,
        name,
        ip_address,
        vendor,
        model,
        role,
        priority,
        ssh_port,
        username,
        connection_timeout,
        enabled,
        is_reachable,
        last_check_at,
        response_time_ms,
    ) = row;

    let ip_address = match ip_address.parse() {
        Ok(ip) => ip,
        Err(_) => {
            warn!(switch_id = id, ip = %ip_address, "Skipping switch with invalid IP");
            return None;
        }
    };
    let (vendor, role) = match (vendor.parse(), role.parse()) {
        (Ok(vendor), Ok(role)) => (vendor, role),
        _ => {
            warn!(switch_id = id, vendor = %vendor, role = %role, "Skipping switch with unknown vendor or role");
            return None;
        }
    };

    Some(Switch {
        id,
        name: Arc::from(name.as_str()),
        ip_address,
        vendor,
        model,
        role,
        priority: priority as i32,
        ssh_port: ssh_port as u16,
        username,
        connection_timeout: connection_timeout.max(1) as u64,
        enabled: enabled != 0,
        is_reachable: is_reachable.map(|r| r != 0),
        last_check_at,
        response_time_ms: response_time_ms.map(|ms| ms.max(0) as u64),
    })
}
