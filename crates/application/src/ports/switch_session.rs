use async_trait::async_trait;
use porttrace_domain::{SessionError, Switch, SwitchCredential};

/// Opens management sessions to switches.
///
/// Implementations do not need to enforce `Switch::connection_timeout`
/// themselves; callers bound `open` with it.
#[async_trait]
pub trait SwitchConnector: Send + Sync {
    async fn open(
        &self,
        switch: &Switch,
        credential: &SwitchCredential,
    ) -> Result<Box<dyn SwitchSession>, SessionError>;
}

/// An authenticated session to one switch.
///
/// Dropping a session without calling `close` must still release the
/// underlying connection, since probes can be aborted at any await point.
#[async_trait]
pub trait SwitchSession: Send {
    /// Runs one command and returns everything it printed.
    async fn run(&mut self, command: &str) -> Result<String, SessionError>;

    async fn close(&mut self);
}
