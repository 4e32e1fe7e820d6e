use async_trait::async_trait;
use porttrace_application::ports::ReachabilityChecker;
use porttrace_domain::{Reachability, Switch};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Considers a switch reachable when its SSH port accepts a TCP connection.
/// No SSH handshake is attempted, so no credentials are involved.
pub struct TcpReachabilityChecker;

impl TcpReachabilityChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TcpReachabilityChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReachabilityChecker for TcpReachabilityChecker {
    async fn check(&self, switch: &Switch, probe_timeout: Duration) -> Reachability {
        let started = Instant::now();
        let result = timeout(
            probe_timeout,
            TcpStream::connect((switch.ip_address, switch.ssh_port)),
        )
        .await;

        match result {
            Ok(Ok(_stream)) => Reachability {
                reachable: true,
                response_time_ms: Some(started.elapsed().as_millis() as u64),
            },
            Ok(Err(e)) => {
                debug!(switch = %switch.name, error = %e, "Switch refused connection");
                Reachability {
                    reachable: false,
                    response_time_ms: None,
                }
            }
            Err(_) => {
                debug!(switch = %switch.name, "Switch did not answer in time");
                Reachability {
                    reachable: false,
                    response_time_ms: None,
                }
            }
        }
    }
}
