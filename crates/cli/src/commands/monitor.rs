use crate::di::UseCases;
use porttrace_domain::Config;
use porttrace_jobs::{HistoryRetentionJob, JobRunner, SwitchStatusJob};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs the background jobs until Ctrl-C.
pub async fn run(use_cases: &UseCases, config: &Config) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();

    let mut runner = JobRunner::new()
        .with_history_retention(HistoryRetentionJob::new(
            use_cases.cleanup_history.clone(),
            config.database.history_retention_days,
        ))
        .with_shutdown_token(shutdown.clone());

    if config.status_check.enabled {
        runner = runner.with_switch_status(
            SwitchStatusJob::new(use_cases.check_status.clone())
                .with_interval(config.status_check.interval_secs),
        );
    }

    runner.start().await;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested, stopping background jobs");
    shutdown.cancel();
    Ok(())
}
