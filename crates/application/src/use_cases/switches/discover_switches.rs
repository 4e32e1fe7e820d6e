use crate::ports::{SwitchConnector, SwitchRepository, SwitchSession};
use futures::stream::{self, StreamExt};
use porttrace_domain::discovery::{detect_vendor, parse_ip_range};
use porttrace_domain::switch::DEFAULT_PRIORITY;
use porttrace_domain::{
    DiscoveredSwitch, DiscoveryCredential, DomainError, LookupOperation, SessionError, Switch,
    SwitchCredential, SwitchRole, Vendor, VendorAdapter,
};
use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DISCOVERY_CONCURRENCY: usize = 20;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    pub total_scanned: usize,
    pub discovered: Vec<DiscoveredSwitch>,
    pub added: Vec<Switch>,
    pub already_known: Vec<IpAddr>,
}

/// Use case: sweep an address range over SSH and identify the switches that
/// answer. Found switches are optionally added to the inventory.
#[derive(Clone)]
pub struct DiscoverSwitchesUseCase {
    repo: Arc<dyn SwitchRepository>,
    connector: Arc<dyn SwitchConnector>,
    connect_timeout: Duration,
    command_timeout: Duration,
    concurrency: usize,
}

impl DiscoverSwitchesUseCase {
    pub fn new(
        repo: Arc<dyn SwitchRepository>,
        connector: Arc<dyn SwitchConnector>,
        command_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            connector,
            connect_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            command_timeout,
            concurrency: DEFAULT_DISCOVERY_CONCURRENCY,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[instrument(skip(self, credentials), fields(credentials = credentials.len()))]
    pub async fn execute(
        &self,
        range: &str,
        credentials: &[DiscoveryCredential],
        add: bool,
    ) -> Result<DiscoveryReport, DomainError> {
        if credentials.is_empty() {
            return Err(DomainError::InvalidInput(
                "at least one credential is required".to_string(),
            ));
        }
        if credentials
            .iter()
            .any(|c| c.username.trim().is_empty() || c.password.is_empty() || c.ssh_port == 0)
        {
            return Err(DomainError::InvalidInput(
                "credentials need a username, a password and a port".to_string(),
            ));
        }

        let targets = parse_ip_range(range)?;
        info!(addresses = targets.len(), "Starting switch discovery");

        let mut found: Vec<(DiscoveredSwitch, &DiscoveryCredential)> =
            stream::iter(targets.iter().copied())
                .map(|ip| self.identify_with_any(ip, credentials))
                .buffer_unordered(self.concurrency)
                .filter_map(|hit| async move { hit })
                .collect()
                .await;
        found.sort_by_key(|(switch, _)| switch.ip_address);

        let mut report = DiscoveryReport {
            total_scanned: targets.len(),
            ..DiscoveryReport::default()
        };
        if add {
            for (switch, credential) in &found {
                self.add(switch, credential, &mut report).await?;
            }
        }
        report.discovered = found.into_iter().map(|(switch, _)| switch).collect();

        info!(
            scanned = report.total_scanned,
            discovered = report.discovered.len(),
            added = report.added.len(),
            already_known = report.already_known.len(),
            "Switch discovery finished"
        );
        Ok(report)
    }

    async fn identify_with_any<'c>(
        &self,
        ip: IpAddr,
        credentials: &'c [DiscoveryCredential],
    ) -> Option<(DiscoveredSwitch, &'c DiscoveryCredential)> {
        for credential in credentials {
            match self.identify(ip, credential).await {
                Ok(switch) => {
                    debug!(%ip, vendor = %switch.vendor, role = %switch.role, "Switch identified");
                    return Some((switch, credential));
                }
                Err(SessionError::ConnectionRefused(_)) | Err(SessionError::Timeout(_)) => {
                    return None;
                }
                Err(e) => {
                    debug!(%ip, username = %credential.username, error = %e, "Login did not identify a switch");
                }
            }
        }
        None
    }

    /// Opens a session as each vendor in turn. An unreachable host stops
    /// the attempt at once.
    async fn identify(
        &self,
        ip: IpAddr,
        credential: &DiscoveryCredential,
    ) -> Result<DiscoveredSwitch, SessionError> {
        let secret = SwitchCredential {
            password: credential.password.clone(),
            enable_password: credential.enable_password.clone(),
        };
        let mut last_error = SessionError::AuthenticationFailed;

        for vendor in Vendor::ALL {
            let candidate = self.candidate(ip, vendor, credential);
            let mut session = match timeout(
                self.connect_timeout,
                self.connector.open(&candidate, &secret),
            )
            .await
            {
                Ok(Ok(session)) => session,
                Ok(Err(e @ (SessionError::ConnectionRefused(_) | SessionError::Timeout(_)))) => {
                    return Err(e)
                }
                Ok(Err(e)) => {
                    last_error = e;
                    continue;
                }
                Err(_) => return Err(SessionError::Timeout(self.connect_timeout.as_secs())),
            };

            let result = self
                .interrogate(session.as_mut(), ip, vendor, credential)
                .await;
            session.close().await;
            match result {
                Ok(switch) => return Ok(switch),
                Err(e) => last_error = e,
            }
        }

        Err(last_error)
    }

    async fn interrogate(
        &self,
        session: &mut dyn SwitchSession,
        ip: IpAddr,
        vendor: Vendor,
        credential: &DiscoveryCredential,
    ) -> Result<DiscoveredSwitch, SessionError> {
        let adapter = VendorAdapter::for_vendor(vendor);

        let version = self.run(session, adapter.version_command()).await?;
        if version.trim().is_empty() {
            return Err(SessionError::ProtocolError(
                "no output from the version command".to_string(),
            ));
        }
        adapter
            .parse(&LookupOperation::ConnectionTest, &version)
            .map_err(|e| SessionError::ProtocolError(e.to_string()))?;

        // The banner may name another platform than the one logged in as.
        let detected = detect_vendor(&version).unwrap_or(vendor);
        // A missing hostname only costs the name; the address stands in.
        let hostname = self
            .run(session, VendorAdapter::for_vendor(detected).hostname_command())
            .await
            .unwrap_or_default();

        Ok(DiscoveredSwitch::from_device_output(
            ip, vendor, &version, &hostname, credential,
        ))
    }

    async fn run(
        &self,
        session: &mut dyn SwitchSession,
        command: &str,
    ) -> Result<String, SessionError> {
        match timeout(self.command_timeout, session.run(command)).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout(self.command_timeout.as_secs())),
        }
    }

    async fn add(
        &self,
        switch: &DiscoveredSwitch,
        credential: &DiscoveryCredential,
        report: &mut DiscoveryReport,
    ) -> Result<(), DomainError> {
        if self.repo.get_by_ip(switch.ip_address).await?.is_some() {
            debug!(ip = %switch.ip_address, "Switch already in inventory, skipping");
            report.already_known.push(switch.ip_address);
            return Ok(());
        }

        let new_switch = switch.to_new_switch(self.connect_timeout.as_secs().max(1));
        new_switch.validate()?;
        let secret = SwitchCredential {
            password: credential.password.clone(),
            enable_password: credential.enable_password.clone(),
        };

        match self.repo.create(new_switch, secret).await {
            Ok(created) => {
                info!(
                    switch_id = created.id,
                    name = %created.name,
                    ip = %created.ip_address,
                    vendor = %created.vendor,
                    role = %created.role,
                    "Discovered switch added"
                );
                report.added.push(created);
                Ok(())
            }
            Err(DomainError::DuplicateSwitch(_)) => {
                report.already_known.push(switch.ip_address);
                Ok(())
            }
            Err(e) => {
                warn!(ip = %switch.ip_address, error = %e, "Failed to add discovered switch");
                Err(e)
            }
        }
    }

    /// Throwaway record used only to open a session before the switch exists.
    fn candidate(&self, ip: IpAddr, vendor: Vendor, credential: &DiscoveryCredential) -> Switch {
        Switch {
            id: 0,
            name: Arc::from(ip.to_string()),
            ip_address: ip,
            vendor,
            model: None,
            role: SwitchRole::Access,
            priority: DEFAULT_PRIORITY,
            ssh_port: credential.ssh_port,
            username: credential.username.clone(),
            connection_timeout: self.connect_timeout.as_secs().max(1),
            enabled: true,
            is_reachable: None,
            last_check_at: None,
            response_time_ms: None,
        }
    }
}
