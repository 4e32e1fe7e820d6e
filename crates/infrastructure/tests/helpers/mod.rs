#![allow(dead_code)]

use porttrace_domain::{NewSwitch, SwitchRole, Vendor};
use porttrace_infrastructure::database::MIGRATOR;
use porttrace_infrastructure::security::CredentialCipher;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

/// In-memory database with the production schema. A single connection keeps
/// every query on the same memory database.
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    MIGRATOR.run(&pool).await.unwrap();
    pool
}

pub fn test_cipher() -> Arc<CredentialCipher> {
    Arc::new(CredentialCipher::new(&[42u8; 32]).unwrap())
}

pub fn new_switch(name: &str, ip: &str, vendor: Vendor) -> NewSwitch {
    let mut switch = NewSwitch::new(name, ip.parse().unwrap(), vendor);
    switch.username = "admin".to_string();
    switch
}

pub fn core_switch(name: &str, ip: &str) -> NewSwitch {
    let mut switch = new_switch(name, ip, Vendor::Cisco);
    switch.role = SwitchRole::Core;
    switch.priority = 1;
    switch
}
