pub mod check_switch_status;
pub mod create_switch;
pub mod delete_switch;
pub mod discover_switches;
pub mod get_switches;
pub mod set_switch_enabled;
pub mod test_connection;

pub use check_switch_status::{CheckSwitchStatusUseCase, StatusSummary};
pub use create_switch::CreateSwitchUseCase;
pub use delete_switch::DeleteSwitchUseCase;
pub use discover_switches::{DiscoverSwitchesUseCase, DiscoveryReport};
pub use get_switches::GetSwitchesUseCase;
pub use set_switch_enabled::SetSwitchEnabledUseCase;
pub use test_connection::{ConnectionTestReport, TestSwitchConnectionUseCase};
