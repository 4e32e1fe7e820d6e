use super::session::SshSession;
use async_trait::async_trait;
use porttrace_application::ports::{SwitchConnector, SwitchSession};
use porttrace_domain::{SessionError, Switch, SwitchCredential, VendorAdapter};
use russh::client;
use russh_keys::key::PublicKey;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Host key policy: switches are addressed by management IP and routinely
/// re-key on replacement, so every key is accepted and its fingerprint logged.
pub(super) struct ClientHandler {
    switch: Arc<str>,
}

#[async_trait]
impl client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        debug!(
            switch = %self.switch,
            fingerprint = %server_public_key.fingerprint(),
            "Accepting switch host key"
        );
        Ok(true)
    }
}

pub struct SshConnector {
    config: Arc<client::Config>,
}

impl SshConnector {
    /// `idle_timeout` closes connections that stop exchanging traffic, as a
    /// backstop behind the per-command timeout.
    pub fn new(idle_timeout: Duration) -> Self {
        let config = client::Config {
            inactivity_timeout: Some(idle_timeout),
            ..Default::default()
        };
        Self {
            config: Arc::new(config),
        }
    }
}

#[async_trait]
impl SwitchConnector for SshConnector {
    #[instrument(skip_all, fields(switch = %switch.name, ip = %switch.ip_address))]
    async fn open(
        &self,
        switch: &Switch,
        credential: &SwitchCredential,
    ) -> Result<Box<dyn SwitchSession>, SessionError> {
        let handler = ClientHandler {
            switch: Arc::clone(&switch.name),
        };

        let mut handle = client::connect(
            Arc::clone(&self.config),
            (switch.ip_address, switch.ssh_port),
            handler,
        )
        .await
        .map_err(map_connect_error)?;

        let authenticated = handle
            .authenticate_password(switch.username.as_str(), credential.password.as_str())
            .await
            .map_err(|e| SessionError::ProtocolError(e.to_string()))?;

        if !authenticated {
            warn!(username = %switch.username, "Switch rejected credentials");
            return Err(SessionError::AuthenticationFailed);
        }

        let mut session = SshSession::new(handle, Arc::clone(&switch.name));
        if let Some((command, secret)) = enable_step(switch, credential) {
            let paging = VendorAdapter::for_vendor(switch.vendor).disable_paging_command();
            session.enter_privileged(command, secret, paging).await?;
        }

        info!("SSH session established");
        Ok(Box::new(session))
    }
}

/// Privileged mode is entered only when the platform has one and an enable
/// secret is stored for the switch.
fn enable_step<'a>(
    switch: &Switch,
    credential: &'a SwitchCredential,
) -> Option<(&'static str, &'a str)> {
    let command = VendorAdapter::for_vendor(switch.vendor).enable_command()?;
    let secret = credential
        .enable_password
        .as_deref()
        .filter(|s| !s.is_empty())?;
    Some((command, secret))
}

fn map_connect_error(error: russh::Error) -> SessionError {
    match error {
        russh::Error::IO(e) if e.kind() == ErrorKind::TimedOut => {
            SessionError::ConnectionRefused(format!("connect timed out: {}", e))
        }
        russh::Error::IO(e) => SessionError::ConnectionRefused(e.to_string()),
        other => SessionError::ProtocolError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use porttrace_domain::{SwitchRole, Vendor};
    use std::io;

    fn lab_switch(vendor: Vendor, ssh_port: u16) -> Switch {
        Switch {
            id: 1,
            name: Arc::from("lab"),
            ip_address: "127.0.0.1".parse().unwrap(),
            vendor,
            model: None,
            role: SwitchRole::Access,
            priority: 50,
            ssh_port,
            username: "admin".to_string(),
            connection_timeout: 5,
            enabled: true,
            is_reachable: None,
            last_check_at: None,
            response_time_ms: None,
        }
    }

    #[test]
    fn test_refused_socket_maps_to_connection_refused() {
        let err = russh::Error::IO(io::Error::new(ErrorKind::ConnectionRefused, "refused"));
        assert!(matches!(
            map_connect_error(err),
            SessionError::ConnectionRefused(_)
        ));
    }

    #[test]
    fn test_handshake_failure_maps_to_protocol_error() {
        let err = russh::Error::NoCommonKexAlgo;
        assert!(matches!(
            map_connect_error(err),
            SessionError::ProtocolError(_)
        ));
    }

    #[test]
    fn test_enable_step_needs_platform_and_secret() {
        let with_secret = SwitchCredential::new("pw").with_enable_password("en");

        assert_eq!(
            enable_step(&lab_switch(Vendor::Cisco, 22), &with_secret),
            Some(("enable", "en"))
        );
        assert_eq!(
            enable_step(&lab_switch(Vendor::Cisco, 22), &SwitchCredential::new("pw")),
            None
        );
        assert_eq!(
            enable_step(
                &lab_switch(Vendor::Cisco, 22),
                &SwitchCredential::new("pw").with_enable_password("")
            ),
            None
        );
        assert_eq!(enable_step(&lab_switch(Vendor::Dell, 22), &with_secret), None);
    }

    #[tokio::test]
    async fn test_open_against_closed_port_fails_fast() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let switch = lab_switch(Vendor::Cisco, port);
        let connector = SshConnector::new(Duration::from_secs(5));
        let result = connector.open(&switch, &SwitchCredential::new("pw")).await;
        assert!(matches!(result, Err(SessionError::ConnectionRefused(_))));
    }
}
