use super::probe::{ProbeTask, SwitchProber};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use porttrace_domain::{DomainError, Switch, SwitchProbeResult};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// One switch to probe, tagged with its position in search order.
pub(crate) struct ProbeJob {
    pub(crate) slot: usize,
    pub(crate) switch: Switch,
    pub(crate) task: ProbeTask,
}

pub(crate) struct BatchReport {
    /// `(slot, result)` for every job of the batch, in search order.
    pub(crate) results: Vec<(usize, SwitchProbeResult)>,
    /// Slot of the best-ranked hit, if any.
    pub(crate) winner: Option<usize>,
    pub(crate) deadline_exceeded: bool,
}

/// Probes `jobs` concurrently and settles on the best-ranked hit.
///
/// `jobs` must be in search order. Once a hit is in, every lower-ranked probe
/// still running is aborted and reported as cancelled, while higher-ranked
/// probes are awaited since their hit would take precedence. When `deadline`
/// passes, whatever is still running is aborted and reported as timed out.
pub(crate) async fn run_batch(
    prober: &SwitchProber,
    jobs: Vec<ProbeJob>,
    deadline: Instant,
    query_started: Instant,
) -> BatchReport {
    let started = Instant::now();
    let count = jobs.len();
    let mut slots: Vec<Option<SwitchProbeResult>> = vec![None; count];
    let mut abort_handles = Vec::with_capacity(count);
    let mut futs = FuturesUnordered::new();

    for (idx, job) in jobs.iter().enumerate() {
        let prober = prober.clone();
        let switch = job.switch.clone();
        let task = job.task;
        let handle = tokio::spawn(async move { prober.probe(&switch, task).await });
        abort_handles.push(handle.abort_handle());
        futs.push(async move { (idx, handle.await) });
    }

    let mut best: Option<usize> = None;
    let mut deadline_exceeded = false;

    loop {
        if let Some(best) = best {
            if slots[..best].iter().all(Option::is_some) {
                break;
            }
        }

        let (idx, joined) = match timeout_at(deadline, futs.next()).await {
            Ok(Some(next)) => next,
            Ok(None) => break,
            Err(_) => {
                deadline_exceeded = true;
                break;
            }
        };

        if slots[idx].is_some() {
            continue;
        }

        let job = &jobs[idx];
        let result = match joined {
            Ok(result) => result,
            Err(e) => {
                warn!(switch = %job.switch.name, error = %e, "Probe task failed");
                let error = DomainError::SwitchUnreachable {
                    switch: job.switch.name.to_string(),
                    detail: format!("probe task failed: {}", e),
                };
                let elapsed = started.elapsed().as_millis() as u64;
                SwitchProbeResult::failed(&job.switch, job.task.phase(), None, &error, elapsed)
            }
        };

        if result.is_hit() && best.map_or(true, |b| idx < b) {
            best = Some(idx);
            let elapsed = started.elapsed().as_millis() as u64;
            for lower in idx + 1..count {
                if slots[lower].is_none() {
                    abort_handles[lower].abort();
                    let job = &jobs[lower];
                    debug!(switch = %job.switch.name, "Probe cancelled by higher-ranked hit");
                    slots[lower] = Some(SwitchProbeResult::cancelled(
                        &job.switch,
                        job.task.phase(),
                        elapsed,
                    ));
                }
            }
        }

        slots[idx] = Some(result);
    }

    let elapsed = started.elapsed().as_millis() as u64;
    let budget_ms = deadline.saturating_duration_since(query_started).as_millis() as u64;
    for (idx, slot) in slots.iter_mut().enumerate() {
        if slot.is_none() {
            abort_handles[idx].abort();
            let job = &jobs[idx];
            *slot = Some(if deadline_exceeded {
                SwitchProbeResult::failed(
                    &job.switch,
                    job.task.phase(),
                    None,
                    &DomainError::QueryDeadlineExceeded(budget_ms),
                    elapsed,
                )
            } else {
                SwitchProbeResult::cancelled(&job.switch, job.task.phase(), elapsed)
            });
        }
    }

    let results = jobs
        .iter()
        .zip(slots)
        .filter_map(|(job, slot)| slot.map(|result| (job.slot, result)))
        .collect();

    BatchReport {
        results,
        winner: best.map(|idx| jobs[idx].slot),
        deadline_exceeded,
    }
}
