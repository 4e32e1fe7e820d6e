mod helpers;

use helpers::SwitchBuilder;
use porttrace_domain::{
    BindingSelection, DomainError, LocatedPort, MacCacheEntry, PortBinding, ProbePhase,
    QueryHistoryEntry, QueryState, QueryStatus, ResolutionOutcome, ResolutionStatus,
    SwitchProbeResult,
};
use std::net::IpAddr;

fn target() -> IpAddr {
    "10.0.0.5".parse().unwrap()
}

fn found_outcome() -> ResolutionOutcome {
    let switch = SwitchBuilder::new(7).build();
    let mac = "aabb.cc00.1122".parse().unwrap();
    let selection = BindingSelection::choose(vec![PortBinding::new("Gi1/0/3", 100)]).unwrap();
    let probe = SwitchProbeResult::hit(&switch, ProbePhase::Full, mac, selection, 42);
    let location = LocatedPort {
        switch_id: switch.id,
        switch_name: switch.name.clone(),
        switch_ip: switch.ip_address,
        port: "Gi1/0/3".to_string(),
        vlan: 100,
    };
    ResolutionOutcome::found(target(), mac, location, 42, vec![probe])
}

#[test]
fn test_state_transitions() {
    assert!(QueryState::Pending.can_transition_to(QueryState::Probing));
    assert!(QueryState::Probing.can_transition_to(QueryState::Resolved));
    assert!(QueryState::Probing.can_transition_to(QueryState::Exhausted));
    assert!(!QueryState::Resolved.can_transition_to(QueryState::Probing));
    assert!(!QueryState::Exhausted.can_transition_to(QueryState::Resolved));
}

#[test]
fn test_not_found_messages() {
    let no_arp = ResolutionOutcome::not_found(target(), ResolutionStatus::NotFound, None, 3, vec![]);
    assert_eq!(no_arp.message, "No ARP entry found for this IP address");
    assert!(!no_arp.found);

    let mac = "aabb.cc00.1122".parse().unwrap();
    let no_port =
        ResolutionOutcome::not_found(target(), ResolutionStatus::NotFound, Some(mac), 3, vec![]);
    assert_eq!(no_port.message, "MAC address not found in any switch MAC table");
    assert_eq!(no_port.mac_address, Some(mac));
}

#[test]
fn test_history_entry_from_found_outcome() {
    let entry = QueryHistoryEntry::from_outcome(&found_outcome());

    assert_eq!(entry.query_status, QueryStatus::Success);
    assert_eq!(entry.found_mac.as_deref(), Some("aa:bb:cc:00:11:22"));
    assert_eq!(entry.switch_id, Some(7));
    assert_eq!(entry.port_name.as_deref(), Some("Gi1/0/3"));
    assert_eq!(entry.vlan_id, Some(100));
    assert!(entry.error_message.is_none());
}

#[test]
fn test_history_entry_for_empty_inventory_is_error() {
    let outcome =
        ResolutionOutcome::not_found(target(), ResolutionStatus::NoSwitches, None, 0, vec![]);
    let entry = QueryHistoryEntry::from_outcome(&outcome);

    assert_eq!(entry.query_status, QueryStatus::Error);
    assert_eq!(entry.error_message.as_deref(), Some("No enabled switches configured"));
}

#[test]
fn test_unreadable_inventory_is_error_row() {
    let error = DomainError::DatabaseError("database is locked".to_string());
    let outcome = ResolutionOutcome::inventory_unavailable(target(), &error, 4);

    assert!(!outcome.found);
    assert_eq!(outcome.status, ResolutionStatus::InventoryUnavailable);
    assert!(outcome.probes.is_empty());
    assert!(outcome.message.contains("database is locked"));

    let entry = QueryHistoryEntry::from_outcome(&outcome);
    assert_eq!(entry.query_status, QueryStatus::Error);
    assert_eq!(entry.error_message.as_deref(), Some(outcome.message.as_str()));
}

#[test]
fn test_mac_cache_entry_only_for_hits() {
    let entry = MacCacheEntry::from_outcome(&found_outcome()).unwrap();
    assert_eq!(entry.switch_id, 7);
    assert_eq!(entry.port_name, "Gi1/0/3");
    assert_eq!(entry.ip_address, Some(target()));

    let miss = ResolutionOutcome::not_found(target(), ResolutionStatus::NotFound, None, 1, vec![]);
    assert!(MacCacheEntry::from_outcome(&miss).is_none());
}

#[test]
fn test_outcome_serializes_status_snake_case() {
    let outcome = ResolutionOutcome::not_found(
        target(),
        ResolutionStatus::DeadlineExceeded,
        None,
        9,
        vec![],
    );
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "deadline_exceeded");
    assert_eq!(json["found"], false);
}
