use super::{or_dash, print_json};
use crate::di::UseCases;
use std::net::IpAddr;

pub async fn run(
    use_cases: &UseCases,
    limit: u32,
    ip: Option<IpAddr>,
    json: bool,
) -> anyhow::Result<()> {
    let rows = use_cases.get_history.execute(limit, ip).await?;
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No queries recorded");
        return Ok(());
    }

    println!(
        "{:<20} {:<16} {:<10} {:<18} {:>6} {:<15} {:>5} {:>7}",
        "WHEN", "TARGET", "STATUS", "MAC", "SWITCH", "PORT", "VLAN", "MS"
    );
    for row in rows {
        println!(
            "{:<20} {:<16} {:<10} {:<18} {:>6} {:<15} {:>5} {:>7}",
            or_dash(row.queried_at),
            row.target_ip,
            row.query_status.as_str(),
            or_dash(row.found_mac),
            or_dash(row.switch_id),
            or_dash(row.port_name),
            or_dash(row.vlan_id),
            row.query_time_ms,
        );
    }
    Ok(())
}

pub async fn run_cache(use_cases: &UseCases, mac: &str, json: bool) -> anyhow::Result<()> {
    let entries = use_cases.lookup_mac_cache.execute(mac).await?;
    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No cached location for {}", mac);
        return Ok(());
    }

    for entry in entries {
        println!(
            "{} switch {} port {} vlan {} (ip {}, last seen {})",
            entry.mac_address,
            entry.switch_id,
            entry.port_name,
            or_dash(entry.vlan_id),
            or_dash(entry.ip_address),
            or_dash(entry.last_seen),
        );
    }
    Ok(())
}
