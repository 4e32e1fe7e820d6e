use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    /// Upper bound on SSH sessions a single query keeps open at once.
    #[serde(default = "default_max_concurrent_sessions")]
    pub max_concurrent_sessions: usize,

    /// Read timeout applied to every command sent over a session.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Overall budget for one query. When unset, the budget is the sum of the
    /// candidates' connection timeouts plus one command timeout.
    #[serde(default)]
    pub query_deadline_secs: Option<u64>,
}

impl LookupConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn query_deadline(&self) -> Option<Duration> {
        self.query_deadline_secs.map(Duration::from_secs)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sessions: default_max_concurrent_sessions(),
            command_timeout_secs: default_command_timeout_secs(),
            query_deadline_secs: None,
        }
    }
}

fn default_max_concurrent_sessions() -> usize {
    10
}

fn default_command_timeout_secs() -> u64 {
    30
}
