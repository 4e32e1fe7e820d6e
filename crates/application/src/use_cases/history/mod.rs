pub mod cleanup_query_history;
pub mod get_query_history;
pub mod lookup_mac_cache;

pub use cleanup_query_history::CleanupQueryHistoryUseCase;
pub use get_query_history::GetQueryHistoryUseCase;
pub use lookup_mac_cache::LookupMacCacheUseCase;
