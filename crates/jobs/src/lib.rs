pub mod history_retention;
pub mod runner;
pub mod switch_status;

pub use history_retention::HistoryRetentionJob;
pub use runner::JobRunner;
pub use switch_status::SwitchStatusJob;
