//! porttrace domain layer
pub mod config;
pub mod discovery;
pub mod errors;
pub mod mac_address;
pub mod mac_cache;
pub mod probe;
pub mod query_history;
pub mod resolution;
pub mod switch;
pub mod vendor;

pub use config::{CliOverrides, Config, ConfigError};
pub use discovery::{DiscoveredSwitch, DiscoveryCredential};
pub use errors::{DomainError, SessionError};
pub use mac_address::MacAddress;
pub use mac_cache::MacCacheEntry;
pub use probe::{
    BindingSelection, PortBinding, ProbeErrorKind, ProbeOutcome, ProbePhase, SwitchProbeResult,
};
pub use query_history::{QueryHistoryEntry, QueryStatus};
pub use resolution::{
    LocatedPort, QueryState, ResolutionOutcome, ResolutionQuery, ResolutionStatus,
};
pub use switch::{NewSwitch, Reachability, Switch, SwitchCredential, SwitchRole, Vendor};
pub use vendor::{LookupOperation, ParseError, ResolutionFragment, VendorAdapter, VendorDialect};
