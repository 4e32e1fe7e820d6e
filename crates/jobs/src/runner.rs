use crate::{HistoryRetentionJob, SwitchStatusJob};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty) => {
        impl SpawnableJob for $t {
            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
                tokio::spawn(async move { self.start().await })
            }
        }
    };
}

impl_spawnable_job!(SwitchStatusJob);
impl_spawnable_job!(HistoryRetentionJob);

fn spawn_job<J: SpawnableJob>(job: Option<J>, shutdown: &Option<CancellationToken>) {
    if let Some(job) = job {
        let job = match shutdown {
            Some(token) => job.with_cancellation(token.clone()),
            None => job,
        };
        Arc::new(job).start_job();
    }
}

/// Starts the background jobs of `porttrace monitor`: a [`SwitchStatusJob`]
/// that refreshes switch reachability and a [`HistoryRetentionJob`] that
/// prunes old query history. Either may be left out; both stop when the
/// shutdown token is cancelled.
pub struct JobRunner {
    switch_status: Option<SwitchStatusJob>,
    history_retention: Option<HistoryRetentionJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            switch_status: None,
            history_retention: None,
            shutdown: None,
        }
    }

    pub fn with_switch_status(mut self, job: SwitchStatusJob) -> Self {
        self.switch_status = Some(job);
        self
    }

    pub fn with_history_retention(mut self, job: HistoryRetentionJob) -> Self {
        self.history_retention = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) {
        info!("Starting background job runner");

        spawn_job(self.switch_status, &self.shutdown);
        spawn_job(self.history_retention, &self.shutdown);

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
