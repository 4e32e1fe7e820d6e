mod database;
mod errors;
mod logging;
mod lookup;
mod root;
mod security;
mod status_check;

pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use lookup::LookupConfig;
pub use root::{CliOverrides, Config};
pub use security::{SecurityConfig, ENCRYPTION_KEY_ENV};
pub use status_check::StatusCheckConfig;
