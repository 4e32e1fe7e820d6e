#![allow(dead_code)]

use async_trait::async_trait;
use porttrace_application::ports::{SwitchConnector, SwitchSession};
use porttrace_domain::{SessionError, Switch, SwitchCredential, Vendor};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a scripted switch reacts to a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginBehavior {
    Accept,
    Refuse,
    RejectCredentials,
    Hang,
}

/// Canned behavior for one switch, keyed by switch id.
#[derive(Debug, Clone)]
pub struct ScriptedSwitch {
    pub login: LoginBehavior,
    pub open_delay: Duration,
    pub command_delay: Duration,
    pub outputs: HashMap<String, String>,
}

impl ScriptedSwitch {
    pub fn new() -> Self {
        Self {
            login: LoginBehavior::Accept,
            open_delay: Duration::ZERO,
            command_delay: Duration::ZERO,
            outputs: HashMap::new(),
        }
    }

    pub fn login(mut self, login: LoginBehavior) -> Self {
        self.login = login;
        self
    }

    pub fn open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    pub fn command_delay(mut self, delay: Duration) -> Self {
        self.command_delay = delay;
        self
    }

    pub fn respond(mut self, command: &str, output: impl Into<String>) -> Self {
        self.outputs.insert(command.to_string(), output.into());
        self
    }
}

impl Default for ScriptedSwitch {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct SessionCounters {
    open_attempts: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
    dropped_open: AtomicUsize,
    active: AtomicUsize,
    peak_active: AtomicUsize,
    attempted_ids: Mutex<Vec<i64>>,
    attempted_logins: Mutex<Vec<(IpAddr, Vendor)>>,
    commands: Mutex<Vec<(i64, String)>>,
}

/// Connector that plays back `ScriptedSwitch` behavior and counts sessions.
/// Switches without a script accept the login and print nothing.
#[derive(Clone, Default)]
pub struct MockSwitchConnector {
    scripts: Arc<Mutex<HashMap<i64, ScriptedSwitch>>>,
    scripts_by_ip: Arc<Mutex<HashMap<IpAddr, ScriptedSwitch>>>,
    counters: Arc<SessionCounters>,
}

impl MockSwitchConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, switch_id: i64, script: ScriptedSwitch) {
        self.scripts.lock().unwrap().insert(switch_id, script);
    }

    /// Scripts an address that is not in the inventory yet. Takes
    /// precedence over a script keyed by id.
    pub fn script_ip(&self, ip: &str, script: ScriptedSwitch) {
        self.scripts_by_ip
            .lock()
            .unwrap()
            .insert(ip.parse().unwrap(), script);
    }

    /// Vendors a login was attempted as at `ip`, in order.
    pub fn vendors_tried_at(&self, ip: &str) -> Vec<Vendor> {
        let ip: IpAddr = ip.parse().unwrap();
        self.counters
            .attempted_logins
            .lock()
            .unwrap()
            .iter()
            .filter(|(at, _)| *at == ip)
            .map(|(_, vendor)| *vendor)
            .collect()
    }

    pub fn open_attempts(&self) -> usize {
        self.counters.open_attempts.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }

    /// Sessions released by drop without an explicit close.
    pub fn dropped_open(&self) -> usize {
        self.counters.dropped_open.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> usize {
        self.counters.active.load(Ordering::SeqCst)
    }

    pub fn peak_active(&self) -> usize {
        self.counters.peak_active.load(Ordering::SeqCst)
    }

    pub fn attempted_ids(&self) -> Vec<i64> {
        self.counters.attempted_ids.lock().unwrap().clone()
    }

    pub fn was_contacted(&self, switch_id: i64) -> bool {
        self.attempted_ids().contains(&switch_id)
    }

    pub fn commands_sent_to(&self, switch_id: i64) -> Vec<String> {
        self.counters
            .commands
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == switch_id)
            .map(|(_, c)| c.clone())
            .collect()
    }
}

#[async_trait]
impl SwitchConnector for MockSwitchConnector {
    async fn open(
        &self,
        switch: &Switch,
        _credential: &SwitchCredential,
    ) -> Result<Box<dyn SwitchSession>, SessionError> {
        self.counters.open_attempts.fetch_add(1, Ordering::SeqCst);
        self.counters.attempted_ids.lock().unwrap().push(switch.id);
        self.counters
            .attempted_logins
            .lock()
            .unwrap()
            .push((switch.ip_address, switch.vendor));

        let by_ip = self
            .scripts_by_ip
            .lock()
            .unwrap()
            .get(&switch.ip_address)
            .cloned();
        let script = by_ip
            .or_else(|| self.scripts.lock().unwrap().get(&switch.id).cloned())
            .unwrap_or_default();

        if !script.open_delay.is_zero() {
            tokio::time::sleep(script.open_delay).await;
        }

        match script.login {
            LoginBehavior::Accept => {}
            LoginBehavior::Refuse => {
                return Err(SessionError::ConnectionRefused("connection refused".into()))
            }
            LoginBehavior::RejectCredentials => return Err(SessionError::AuthenticationFailed),
            LoginBehavior::Hang => {
                std::future::pending::<()>().await;
            }
        }

        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak_active.fetch_max(active, Ordering::SeqCst);

        Ok(Box::new(MockSession {
            switch_id: switch.id,
            script,
            counters: Arc::clone(&self.counters),
            released: false,
        }))
    }
}

struct MockSession {
    switch_id: i64,
    script: ScriptedSwitch,
    counters: Arc<SessionCounters>,
    released: bool,
}

impl MockSession {
    fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
        true
    }
}

#[async_trait]
impl SwitchSession for MockSession {
    async fn run(&mut self, command: &str) -> Result<String, SessionError> {
        self.counters
            .commands
            .lock()
            .unwrap()
            .push((self.switch_id, command.to_string()));
        if !self.script.command_delay.is_zero() {
            tokio::time::sleep(self.script.command_delay).await;
        }
        Ok(self.script.outputs.get(command).cloned().unwrap_or_default())
    }

    async fn close(&mut self) {
        if self.release() {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        if self.release() {
            self.counters.dropped_open.fetch_add(1, Ordering::SeqCst);
        }
    }
}
