use super::connector::ClientHandler;
use super::shell::PrivilegedShell;
use async_trait::async_trait;
use porttrace_application::ports::SwitchSession;
use porttrace_domain::SessionError;
use russh::client::Handle;
use russh::{ChannelMsg, Disconnect};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Live SSH connection to one switch.
///
/// Dropping the session drops the russh handle, which ends the client task
/// and closes the TCP connection even when `close` was never reached.
pub struct SshSession {
    handle: Option<Handle<ClientHandler>>,
    shell: Option<PrivilegedShell>,
    switch: Arc<str>,
}

impl SshSession {
    pub(super) fn new(handle: Handle<ClientHandler>, switch: Arc<str>) -> Self {
        Self {
            handle: Some(handle),
            shell: None,
            switch,
        }
    }

    /// Routes every later command through a shell in privileged mode.
    pub(super) async fn enter_privileged(
        &mut self,
        enable_command: &str,
        enable_password: &str,
        disable_paging: Option<&str>,
    ) -> Result<(), SessionError> {
        let handle = self.live_handle()?;
        let shell =
            PrivilegedShell::open(handle, enable_command, enable_password, disable_paging).await?;
        self.shell = Some(shell);
        Ok(())
    }

    fn live_handle(&self) -> Result<&Handle<ClientHandler>, SessionError> {
        self.handle
            .as_ref()
            .ok_or_else(|| SessionError::ProtocolError("session already closed".to_string()))
    }
}

#[async_trait]
impl SwitchSession for SshSession {
    #[instrument(skip(self), fields(switch = %self.switch))]
    async fn run(&mut self, command: &str) -> Result<String, SessionError> {
        if let Some(shell) = self.shell.as_mut() {
            let output = shell.run(command).await?;
            debug!(bytes = output.len(), "Command output received");
            return Ok(output);
        }

        let mut channel = self
            .live_handle()?
            .channel_open_session()
            .await
            .map_err(|e| SessionError::ProtocolError(format!("channel open failed: {}", e)))?;
        channel
            .exec(true, command)
            .await
            .map_err(|e| SessionError::ProtocolError(format!("exec failed: {}", e)))?;

        let mut output = Vec::new();
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => output.extend_from_slice(data),
                // Some platforms print command errors on stderr.
                ChannelMsg::ExtendedData { ref data, .. } => output.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status } => {
                    debug!(exit_status, "Command exited");
                }
                ChannelMsg::Eof | ChannelMsg::Close => break,
                _ => {}
            }
        }

        debug!(bytes = output.len(), "Command output received");
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    async fn close(&mut self) {
        self.shell = None;
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle
                .disconnect(Disconnect::ByApplication, "", "English")
                .await
            {
                debug!(switch = %self.switch, error = %e, "Disconnect failed, dropping connection");
            }
        }
    }
}
