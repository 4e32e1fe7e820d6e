pub mod mac_cache_repository;
pub mod query_history_repository;
pub mod switch_repository;
mod switch_row_mapper;

pub use mac_cache_repository::SqliteMacCacheRepository;
pub use query_history_repository::SqliteQueryHistoryRepository;
pub use switch_repository::SqliteSwitchRepository;
