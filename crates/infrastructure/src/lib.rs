//! porttrace infrastructure: SQLite persistence, credential sealing, SSH
//! sessions and reachability probing behind the application ports.
pub mod database;
pub mod repositories;
pub mod security;
pub mod ssh;
pub mod system;
