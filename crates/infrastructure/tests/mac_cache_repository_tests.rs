mod helpers;

use helpers::{create_test_db, new_switch, test_cipher};
use porttrace_application::ports::{MacCacheRepository, SwitchRepository};
use porttrace_domain::{MacAddress, MacCacheEntry, SwitchCredential, Vendor};
use porttrace_infrastructure::repositories::{SqliteMacCacheRepository, SqliteSwitchRepository};

fn entry(switch_id: i64, port: &str, vlan: u16) -> MacCacheEntry {
    MacCacheEntry {
        mac_address: "aa:bb:cc:00:11:22".parse().unwrap(),
        ip_address: Some("10.0.0.5".parse().unwrap()),
        switch_id,
        port_name: port.to_string(),
        vlan_id: Some(vlan),
        first_seen: None,
        last_seen: None,
    }
}

#[tokio::test]
async fn test_upsert_is_unique_per_mac_switch_port() {
    let pool = create_test_db().await;
    let switches = SqliteSwitchRepository::new(pool.clone(), test_cipher());
    let switch = switches
        .create(new_switch("sw", "10.0.0.1", Vendor::Cisco), SwitchCredential::new("pw"))
        .await
        .unwrap();
    let cache = SqliteMacCacheRepository::new(pool);

    cache.upsert(&entry(switch.id, "Gi1/0/3", 100)).await.unwrap();
    cache.upsert(&entry(switch.id, "Gi1/0/3", 200)).await.unwrap();

    let mac: MacAddress = "aabb.cc00.1122".parse().unwrap();
    let rows = cache.find_by_mac(&mac).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].vlan_id, Some(200));
    assert!(rows[0].first_seen.is_some());
    assert!(rows[0].last_seen.is_some());
}

#[tokio::test]
async fn test_moved_device_gets_new_row() {
    let pool = create_test_db().await;
    let switches = SqliteSwitchRepository::new(pool.clone(), test_cipher());
    let switch = switches
        .create(new_switch("sw", "10.0.0.1", Vendor::Cisco), SwitchCredential::new("pw"))
        .await
        .unwrap();
    let cache = SqliteMacCacheRepository::new(pool);

    cache.upsert(&entry(switch.id, "Gi1/0/3", 100)).await.unwrap();
    cache.upsert(&entry(switch.id, "Gi1/0/9", 100)).await.unwrap();

    let mac: MacAddress = "aa:bb:cc:00:11:22".parse().unwrap();
    assert_eq!(cache.find_by_mac(&mac).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_mac_is_empty() {
    let pool = create_test_db().await;
    let cache = SqliteMacCacheRepository::new(pool);

    let mac: MacAddress = "00:11:22:33:44:55".parse().unwrap();
    assert!(cache.find_by_mac(&mac).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rows_removed_with_switch() {
    let pool = create_test_db().await;
    let switches = SqliteSwitchRepository::new(pool.clone(), test_cipher());
    let switch = switches
        .create(new_switch("sw", "10.0.0.1", Vendor::Dell), SwitchCredential::new("pw"))
        .await
        .unwrap();
    let cache = SqliteMacCacheRepository::new(pool);
    cache.upsert(&entry(switch.id, "1/1/4", 10)).await.unwrap();

    switches.delete(switch.id).await.unwrap();

    let mac: MacAddress = "aa:bb:cc:00:11:22".parse().unwrap();
    assert!(cache.find_by_mac(&mac).await.unwrap().is_empty());
}
