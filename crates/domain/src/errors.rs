use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No enabled switches configured")]
    NoSwitchesConfigured,

    #[error("Switch {switch} is unreachable: {detail}")]
    SwitchUnreachable { switch: String, detail: String },

    #[error("Authentication failed for switch {switch}")]
    SwitchAuthFailed { switch: String },

    #[error("Timeout talking to switch {switch}")]
    SwitchTimeout { switch: String },

    #[error("Unrecognized output from switch {switch}: {detail}")]
    SwitchParseError { switch: String, detail: String },

    #[error("Query deadline of {0}ms exceeded")]
    QueryDeadlineExceeded(u64),

    #[error("Switch not found: {0}")]
    SwitchNotFound(i64),

    #[error("Switch with IP {0} already exists")]
    DuplicateSwitch(String),

    #[error("Invalid switch: {0}")]
    InvalidSwitch(String),

    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("Credential error: {0}")]
    CredentialError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Failures of a single management session, independent of the SSH library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("protocol error: {0}")]
    ProtocolError(String),
}

impl SessionError {
    /// Lifts a session failure into the per-switch error taxonomy.
    pub fn into_domain(self, switch: &str) -> DomainError {
        let switch = switch.to_string();
        match self {
            SessionError::ConnectionRefused(detail) => {
                DomainError::SwitchUnreachable { switch, detail }
            }
            SessionError::AuthenticationFailed => DomainError::SwitchAuthFailed { switch },
            SessionError::Timeout(_) => DomainError::SwitchTimeout { switch },
            SessionError::ProtocolError(detail) => {
                DomainError::SwitchUnreachable { switch, detail }
            }
        }
    }
}
