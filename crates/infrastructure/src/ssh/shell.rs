use super::connector::ClientHandler;
use porttrace_domain::SessionError;
use russh::client::{Handle, Msg};
use russh::{Channel, ChannelMsg};
use tracing::{debug, instrument, warn};

/// Longest line still treated as a prompt (`hostname#`, `console>`).
const MAX_PROMPT_LEN: usize = 64;

/// Wide enough that IOS does not wrap forwarding-table rows.
const TERMINAL_COLUMNS: u32 = 511;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Prompt {
    User,
    Privileged,
    Password,
}

/// Interactive shell raised to privileged mode.
///
/// Exec channels each start a fresh unprivileged CLI, so platforms that
/// restrict `show` commands to enable mode are driven through one shell
/// instead: a command is written, and its output is everything the device
/// prints until the prompt comes back.
pub(super) struct PrivilegedShell {
    channel: Channel<Msg>,
    buffer: String,
}

impl PrivilegedShell {
    #[instrument(skip_all)]
    pub(super) async fn open(
        handle: &Handle<ClientHandler>,
        enable_command: &str,
        enable_password: &str,
        disable_paging: Option<&str>,
    ) -> Result<Self, SessionError> {
        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| protocol("channel open failed", e))?;
        channel
            .request_pty(false, "vt100", TERMINAL_COLUMNS, 24, 0, 0, &[])
            .await
            .map_err(|e| protocol("pty request failed", e))?;
        channel
            .request_shell(false)
            .await
            .map_err(|e| protocol("shell request failed", e))?;

        let mut shell = Self {
            channel,
            buffer: String::new(),
        };

        let (_, mut prompt) = shell.read_until_prompt().await?;
        if prompt == Prompt::User {
            shell.send(enable_command).await?;
            prompt = shell.read_until_prompt().await?.1;
            if prompt == Prompt::Password {
                shell.send(enable_password).await?;
                prompt = shell.read_until_prompt().await?.1;
            }
        }

        if prompt != Prompt::Privileged {
            warn!(prompt = ?prompt, "Switch refused privileged mode");
            return Err(SessionError::AuthenticationFailed);
        }

        if let Some(command) = disable_paging {
            shell.run(command).await?;
        }
        debug!("Privileged shell ready");
        Ok(shell)
    }

    pub(super) async fn run(&mut self, command: &str) -> Result<String, SessionError> {
        self.send(command).await?;
        let (raw, _) = self.read_until_prompt().await?;
        Ok(clean_output(&raw, command))
    }

    async fn send(&mut self, line: &str) -> Result<(), SessionError> {
        let line = format!("{}\n", line);
        self.channel
            .data(line.as_bytes())
            .await
            .map_err(|e| protocol("write failed", e))
    }

    async fn read_until_prompt(&mut self) -> Result<(String, Prompt), SessionError> {
        loop {
            if let Some(prompt) = detect_prompt(&self.buffer) {
                return Ok((std::mem::take(&mut self.buffer), prompt));
            }
            match self.channel.wait().await {
                Some(ChannelMsg::Data { ref data })
                | Some(ChannelMsg::ExtendedData { ref data, .. }) => {
                    self.buffer.push_str(&String::from_utf8_lossy(data));
                }
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(SessionError::ProtocolError(
                        "shell closed before the prompt returned".to_string(),
                    ));
                }
                Some(_) => {}
            }
        }
    }
}

fn protocol(context: &str, error: russh::Error) -> SessionError {
    SessionError::ProtocolError(format!("{}: {}", context, error))
}

/// Classifies the last line of `buffer` when it is a prompt.
fn detect_prompt(buffer: &str) -> Option<Prompt> {
    let last = buffer
        .rsplit(|c| c == '\n' || c == '\r')
        .next()?
        .trim_end();

    if last.to_ascii_lowercase().ends_with("password:") {
        return Some(Prompt::Password);
    }
    if last.len() < 2 || last.len() > MAX_PROMPT_LEN || last.chars().any(char::is_whitespace) {
        return None;
    }
    match last.chars().last()? {
        '#' => Some(Prompt::Privileged),
        '>' => Some(Prompt::User),
        _ => None,
    }
}

/// Drops the echoed command and the trailing prompt.
fn clean_output(raw: &str, command: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "");
    let mut lines: Vec<&str> = normalized.lines().collect();
    lines.pop();
    if lines
        .first()
        .is_some_and(|first| first.trim_end().ends_with(command.trim()))
    {
        lines.remove(0);
    }

    let mut output = lines.join("\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}
