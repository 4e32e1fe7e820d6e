mod audit_recorder;
mod credential_store;
mod mac_cache_repository;
mod query_history_repository;
mod reachability_checker;
mod switch_repository;
mod switch_session;

pub use audit_recorder::AuditRecorder;
pub use credential_store::CredentialStore;
pub use mac_cache_repository::MacCacheRepository;
pub use query_history_repository::QueryHistoryRepository;
pub use reachability_checker::ReachabilityChecker;
pub use switch_repository::SwitchRepository;
pub use switch_session::{SwitchConnector, SwitchSession};
