use crate::ports::{CredentialStore, SwitchConnector, SwitchSession};
use porttrace_domain::{
    BindingSelection, DomainError, LookupOperation, MacAddress, PortBinding, ProbePhase,
    ResolutionFragment, SessionError, Switch, SwitchProbeResult, VendorAdapter,
};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::debug;

/// What a probe asks of one switch.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ProbeTask {
    /// ARP lookup for the target, then the forwarding lookup if a MAC shows up.
    Full(IpAddr),
    /// Forwarding lookup only, for a MAC already learned elsewhere.
    ForwardingOnly(MacAddress),
}

impl ProbeTask {
    pub(crate) fn phase(&self) -> ProbePhase {
        match self {
            ProbeTask::Full(_) => ProbePhase::Full,
            ProbeTask::ForwardingOnly(_) => ProbePhase::ForwardingOnly,
        }
    }
}

enum Lookup {
    Hit(MacAddress, BindingSelection),
    Miss(Option<MacAddress>),
}

type LookupFailure = (Option<MacAddress>, DomainError);

/// Runs the per-switch half of a resolution over a single session.
#[derive(Clone)]
pub(crate) struct SwitchProber {
    credentials: Arc<dyn CredentialStore>,
    connector: Arc<dyn SwitchConnector>,
    command_timeout: Duration,
}

impl SwitchProber {
    pub(crate) fn new(
        credentials: Arc<dyn CredentialStore>,
        connector: Arc<dyn SwitchConnector>,
        command_timeout: Duration,
    ) -> Self {
        Self {
            credentials,
            connector,
            command_timeout,
        }
    }

    /// Never fails: every failure is folded into the returned diagnostics.
    pub(crate) async fn probe(&self, switch: &Switch, task: ProbeTask) -> SwitchProbeResult {
        let started = Instant::now();
        let phase = task.phase();
        let known_mac = match task {
            ProbeTask::Full(_) => None,
            ProbeTask::ForwardingOnly(mac) => Some(mac),
        };
        let elapsed = || started.elapsed().as_millis() as u64;

        let mut session = match self.open_session(switch).await {
            Ok(session) => session,
            Err(e) => {
                debug!(switch = %switch.name, error = %e, "Session not established");
                return SwitchProbeResult::failed(switch, phase, known_mac, &e, elapsed());
            }
        };

        let lookup = self.run_lookups(session.as_mut(), switch, task).await;
        session.close().await;

        match lookup {
            Ok(Lookup::Hit(mac, selection)) => {
                debug!(
                    switch = %switch.name,
                    port = %selection.chosen.port,
                    vlan = selection.chosen.vlan,
                    ambiguous = selection.ambiguous,
                    "Port located"
                );
                SwitchProbeResult::hit(switch, phase, mac, selection, elapsed())
            }
            Ok(Lookup::Miss(mac)) => SwitchProbeResult::miss(switch, phase, mac, elapsed()),
            Err((mac, e)) => {
                debug!(switch = %switch.name, error = %e, "Probe failed");
                SwitchProbeResult::failed(switch, phase, mac.or(known_mac), &e, elapsed())
            }
        }
    }

    /// Fetches the credential and opens a session within the switch's
    /// connection timeout.
    pub(crate) async fn open_session(
        &self,
        switch: &Switch,
    ) -> Result<Box<dyn SwitchSession>, DomainError> {
        let credential = self
            .credentials
            .get_credential(switch.id)
            .await
            .map_err(|e| match e {
                DomainError::CredentialError(_) => e,
                other => DomainError::CredentialError(other.to_string()),
            })?;

        let budget = Duration::from_secs(switch.connection_timeout);
        match timeout(budget, self.connector.open(switch, &credential)).await {
            Ok(Ok(session)) => Ok(session),
            Ok(Err(e)) => Err(e.into_domain(&switch.name)),
            Err(_) => Err(SessionError::Timeout(switch.connection_timeout).into_domain(&switch.name)),
        }
    }

    async fn run_lookups(
        &self,
        session: &mut dyn SwitchSession,
        switch: &Switch,
        task: ProbeTask,
    ) -> Result<Lookup, LookupFailure> {
        let mac = match task {
            ProbeTask::ForwardingOnly(mac) => mac,
            ProbeTask::Full(target) => {
                let operation = LookupOperation::ArpLookup(target);
                match self.execute(session, switch, &operation).await {
                    Ok(ResolutionFragment::ArpEntry(Some(mac))) => mac,
                    Ok(ResolutionFragment::ArpEntry(None)) => return Ok(Lookup::Miss(None)),
                    Ok(other) => return Err((None, unexpected_fragment(switch, &other))),
                    Err(e) => return Err((None, e)),
                }
            }
        };

        let operation = LookupOperation::MacTableLookup(mac);
        let bindings: Vec<PortBinding> = match self.execute(session, switch, &operation).await {
            Ok(ResolutionFragment::ForwardingEntries(rows)) => rows,
            Ok(other) => return Err((Some(mac), unexpected_fragment(switch, &other))),
            Err(e) => return Err((Some(mac), e)),
        };

        Ok(match BindingSelection::choose(bindings) {
            Some(selection) => Lookup::Hit(mac, selection),
            None => Lookup::Miss(Some(mac)),
        })
    }

    /// Sends every command of `operation` and parses the combined output.
    pub(crate) async fn execute(
        &self,
        session: &mut dyn SwitchSession,
        switch: &Switch,
        operation: &LookupOperation,
    ) -> Result<ResolutionFragment, DomainError> {
        let adapter = VendorAdapter::for_vendor(switch.vendor);
        let mut raw = String::new();

        for command in adapter.commands_for(operation) {
            debug!(switch = %switch.name, command = %command, "Sending command");
            let output = match timeout(self.command_timeout, session.run(&command)).await {
                Ok(result) => result.map_err(|e| e.into_domain(&switch.name))?,
                Err(_) => {
                    return Err(SessionError::Timeout(self.command_timeout.as_secs())
                        .into_domain(&switch.name))
                }
            };
            raw.push_str(&output);
            if !raw.ends_with('\n') {
                raw.push('\n');
            }
        }

        adapter
            .parse(operation, &raw)
            .map_err(|e| DomainError::SwitchParseError {
                switch: switch.name.to_string(),
                detail: e.to_string(),
            })
    }
}

fn unexpected_fragment(switch: &Switch, fragment: &ResolutionFragment) -> DomainError {
    DomainError::SwitchParseError {
        switch: switch.name.to_string(),
        detail: format!("unexpected fragment {:?}", fragment),
    }
}
