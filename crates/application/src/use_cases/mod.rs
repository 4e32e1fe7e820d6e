pub mod history;
pub mod lookup;
pub mod switches;

// Re-export use cases
pub use history::{CleanupQueryHistoryUseCase, GetQueryHistoryUseCase, LookupMacCacheUseCase};
pub use lookup::ResolveIpUseCase;
pub use switches::{
    CheckSwitchStatusUseCase, ConnectionTestReport, CreateSwitchUseCase, DeleteSwitchUseCase,
    DiscoverSwitchesUseCase, DiscoveryReport, GetSwitchesUseCase, SetSwitchEnabledUseCase,
    StatusSummary, TestSwitchConnectionUseCase,
};
