use async_trait::async_trait;
use porttrace_domain::{Reachability, Switch};
use std::time::Duration;

#[async_trait]
pub trait ReachabilityChecker: Send + Sync {
    /// Never fails: an unreachable switch is a `Reachability` with
    /// `reachable = false`.
    async fn check(&self, switch: &Switch, timeout: Duration) -> Reachability;
}
