use super::batch::{run_batch, BatchReport, ProbeJob};
use super::probe::{ProbeTask, SwitchProber};
use crate::ports::{
    AuditRecorder, CredentialStore, MacCacheRepository, SwitchConnector, SwitchRepository,
};
use porttrace_domain::config::LookupConfig;
use porttrace_domain::switch::sort_by_search_order;
use porttrace_domain::{
    DomainError, LocatedPort, MacAddress, MacCacheEntry, ProbePhase, QueryState,
    ResolutionOutcome, ResolutionQuery, ResolutionStatus, Switch, SwitchProbeResult,
};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, instrument, warn, Instrument};

/// Use case: locate the switch port an IP address is attached to.
///
/// Switches are searched core first, then aggregation, then access, in
/// windows of at most `max_concurrent_sessions` that never mix tiers. The
/// best-ranked hit wins regardless of which switch answered first.
///
/// History and MAC-cache writes run in the background after the answer is
/// returned; call [`ResolveIpUseCase::flush`] before shutting down.
pub struct ResolveIpUseCase {
    switch_repo: Arc<dyn SwitchRepository>,
    audit: Arc<dyn AuditRecorder>,
    mac_cache: Option<Arc<dyn MacCacheRepository>>,
    prober: SwitchProber,
    config: LookupConfig,
    pending_writes: TaskTracker,
}

struct ProbeLedger {
    slots: Vec<Option<SwitchProbeResult>>,
    known_mac: Option<MacAddress>,
    forwarding_checked: HashSet<usize>,
    winner: Option<usize>,
    deadline_exceeded: bool,
}

impl ProbeLedger {
    fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
            known_mac: None,
            forwarding_checked: HashSet::new(),
            winner: None,
            deadline_exceeded: false,
        }
    }

    fn absorb(&mut self, report: BatchReport) {
        for (slot, result) in report.results {
            let checked_known_mac = match result.phase {
                ProbePhase::ForwardingOnly => true,
                ProbePhase::Full => {
                    result.mac_address.is_some() && result.mac_address == self.known_mac
                }
            };
            if checked_known_mac {
                self.forwarding_checked.insert(slot);
            }
            self.slots[slot] = Some(result);
        }
        self.winner = self.winner.or(report.winner);
        self.deadline_exceeded |= report.deadline_exceeded;
    }

    /// Adopts the best-ranked MAC learned so far. Returns it only when it is
    /// newly learned.
    fn learn_mac(&mut self) -> Option<MacAddress> {
        if self.known_mac.is_some() {
            return None;
        }
        let (slot, mac) = self
            .slots
            .iter()
            .enumerate()
            .find_map(|(i, r)| r.as_ref().and_then(|r| r.mac_address).map(|m| (i, m)))?;
        self.known_mac = Some(mac);
        for (i, result) in self.slots.iter().enumerate() {
            if let Some(result) = result {
                if result.mac_address == Some(mac) {
                    self.forwarding_checked.insert(i);
                }
            }
        }
        debug!(mac = %mac, slot, "MAC learned without a port");
        Some(mac)
    }

    fn is_settled(&self) -> bool {
        self.winner.is_some() || self.deadline_exceeded
    }
}

impl ResolveIpUseCase {
    pub fn new(
        switch_repo: Arc<dyn SwitchRepository>,
        credentials: Arc<dyn CredentialStore>,
        connector: Arc<dyn SwitchConnector>,
        audit: Arc<dyn AuditRecorder>,
        config: LookupConfig,
    ) -> Self {
        let prober = SwitchProber::new(credentials, connector, config.command_timeout());
        Self {
            switch_repo,
            audit,
            mac_cache: None,
            prober,
            config,
            pending_writes: TaskTracker::new(),
        }
    }

    pub fn with_mac_cache(mut self, mac_cache: Arc<dyn MacCacheRepository>) -> Self {
        self.mac_cache = Some(mac_cache);
        self
    }

    /// Only an unparseable target is an `Err`. An unreadable inventory and
    /// per-switch failures both come back as a miss with diagnostics.
    #[instrument(skip(self))]
    pub async fn execute(&self, target: &str) -> Result<ResolutionOutcome, DomainError> {
        let started = Instant::now();
        let target_ip: IpAddr = target.trim().parse().map_err(|_| {
            DomainError::InvalidInput(format!("'{}' is not a valid IP address", target.trim()))
        })?;
        let state = QueryState::Pending;

        let mut candidates: Vec<Switch> = match self.switch_repo.list_enabled().await {
            Ok(switches) => switches.into_iter().filter(|s| s.enabled).collect(),
            Err(e) => {
                error!(error = %e, "Failed to load switch inventory");
                advance(state, QueryState::Exhausted);
                let outcome =
                    ResolutionOutcome::inventory_unavailable(target_ip, &e, elapsed_ms(started));
                self.record(ResolutionQuery::new(target_ip, Vec::new()), outcome.clone());
                return Ok(outcome);
            }
        };
        sort_by_search_order(&mut candidates);

        let query = ResolutionQuery::new(target_ip, candidates);

        let outcome = if query.candidates.is_empty() {
            warn!("{}", DomainError::NoSwitchesConfigured);
            advance(state, QueryState::Exhausted);
            ResolutionOutcome::not_found(
                target_ip,
                ResolutionStatus::NoSwitches,
                None,
                elapsed_ms(started),
                Vec::new(),
            )
        } else {
            let state = advance(state, QueryState::Probing);
            let deadline = started + self.query_budget(&query.candidates);
            let ledger = self.probe_all(&query, deadline, started).await;
            let outcome = self.conclude(&query, ledger, started);
            advance(
                state,
                if outcome.found {
                    QueryState::Resolved
                } else {
                    QueryState::Exhausted
                },
            );
            outcome
        };

        info!(
            found = outcome.found,
            status = ?outcome.status,
            mac = ?outcome.mac_address.map(|m| m.to_string()),
            switch_id = ?outcome.switch_id(),
            probes = outcome.probes.len(),
            query_time_ms = outcome.query_time_ms,
            "Resolution finished"
        );

        self.record(query, outcome.clone());
        Ok(outcome)
    }

    /// Waits for the history and cache writes of every query answered so far.
    pub async fn flush(&self) {
        self.pending_writes.close();
        self.pending_writes.wait().await;
        self.pending_writes.reopen();
    }

    fn query_budget(&self, candidates: &[Switch]) -> Duration {
        self.config.query_deadline().unwrap_or_else(|| {
            let connect: u64 = candidates.iter().map(|s| s.connection_timeout).sum();
            Duration::from_secs(connect) + self.config.command_timeout()
        })
    }

    async fn probe_all(
        &self,
        query: &ResolutionQuery,
        deadline: Instant,
        started: Instant,
    ) -> ProbeLedger {
        let candidates = &query.candidates;
        let window = self.config.max_concurrent_sessions.max(1);
        let mut ledger = ProbeLedger::new(candidates.len());
        let mut next = 0;

        while next < candidates.len() && !ledger.is_settled() {
            let tier = candidates[next].role;
            let tier_end = candidates[next..]
                .iter()
                .position(|s| s.role != tier)
                .map_or(candidates.len(), |offset| next + offset);
            let end = (next + window).min(tier_end);
            let task = match ledger.known_mac {
                Some(mac) => ProbeTask::ForwardingOnly(mac),
                None => ProbeTask::Full(query.target),
            };
            let jobs = (next..end)
                .map(|slot| ProbeJob {
                    slot,
                    switch: candidates[slot].clone(),
                    task,
                })
                .collect();
            debug!(from = next, to = end, phase = ?task.phase(), "Probing batch");

            let report = run_batch(&self.prober, jobs, deadline, started).await;
            ledger.absorb(report);
            next = end;

            if ledger.is_settled() {
                break;
            }

            if let Some(mac) = ledger.learn_mac() {
                self.follow_up(query, &mut ledger, mac, next, deadline, started)
                    .await;
            }
        }

        ledger
    }

    /// Asks the already-queried reachable switches whose forwarding table has
    /// not been checked for `mac` yet, in search order.
    async fn follow_up(
        &self,
        query: &ResolutionQuery,
        ledger: &mut ProbeLedger,
        mac: MacAddress,
        queried: usize,
        deadline: Instant,
        started: Instant,
    ) {
        let pending: Vec<usize> = (0..queried)
            .filter(|slot| !ledger.forwarding_checked.contains(slot))
            .filter(|slot| {
                ledger.slots[*slot]
                    .as_ref()
                    .is_some_and(SwitchProbeResult::was_reachable)
            })
            .collect();

        for chunk in pending.chunks(self.config.max_concurrent_sessions.max(1)) {
            if ledger.is_settled() {
                break;
            }
            let jobs = chunk
                .iter()
                .map(|&slot| ProbeJob {
                    slot,
                    switch: query.candidates[slot].clone(),
                    task: ProbeTask::ForwardingOnly(mac),
                })
                .collect();
            debug!(switches = chunk.len(), mac = %mac, "Forwarding follow-up");
            let report = run_batch(&self.prober, jobs, deadline, started).await;
            ledger.absorb(report);
        }
    }

    fn conclude(
        &self,
        query: &ResolutionQuery,
        ledger: ProbeLedger,
        started: Instant,
    ) -> ResolutionOutcome {
        let located = ledger.winner.and_then(|slot| {
            let result = ledger.slots[slot].as_ref()?;
            Some((
                result.mac_address?,
                LocatedPort {
                    switch_id: result.switch_id,
                    switch_name: Arc::clone(&result.switch_name),
                    switch_ip: result.switch_ip,
                    port: result.port.clone()?,
                    vlan: result.vlan?,
                },
            ))
        });
        let deadline_exceeded = ledger.deadline_exceeded;
        let known_mac = ledger.known_mac;
        let probes: Vec<SwitchProbeResult> = ledger.slots.into_iter().flatten().collect();
        let query_time_ms = elapsed_ms(started);

        match located {
            Some((mac, location)) => {
                ResolutionOutcome::found(query.target, mac, location, query_time_ms, probes)
            }
            None => {
                let status = if deadline_exceeded {
                    ResolutionStatus::DeadlineExceeded
                } else {
                    ResolutionStatus::NotFound
                };
                let mac = known_mac.or_else(|| probes.iter().find_map(|p| p.mac_address));
                ResolutionOutcome::not_found(query.target, status, mac, query_time_ms, probes)
            }
        }
    }

    fn record(&self, query: ResolutionQuery, outcome: ResolutionOutcome) {
        let audit = Arc::clone(&self.audit);
        let mac_cache = self.mac_cache.clone();

        self.pending_writes.spawn(
            async move {
                match audit.record(&query, &outcome).await {
                    Ok(id) => debug!(history_id = id, "Query recorded"),
                    Err(e) => warn!(error = %e, "Failed to record query history"),
                }

                if let (Some(cache), Some(entry)) = (mac_cache, MacCacheEntry::from_outcome(&outcome))
                {
                    if let Err(e) = cache.upsert(&entry).await {
                        warn!(error = %e, mac = %entry.mac_address, "Failed to update MAC cache");
                    }
                }
            }
            .in_current_span(),
        );
    }
}

fn advance(from: QueryState, to: QueryState) -> QueryState {
    debug_assert!(from.can_transition_to(to), "{:?} -> {:?}", from, to);
    debug!(from = ?from, to = ?to, "Query state");
    to
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
