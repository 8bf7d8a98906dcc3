use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::core::error::Result;

/// Work executed on a fixed interval by a [`Scheduler`]
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    fn name(&self) -> &'static str;

    /// One pass; long passes should return early once `shutdown` is cancelled
    async fn run(&self, shutdown: &CancellationToken) -> Result<()>;
}

/// Single recurring timer driving one job until shutdown
pub struct Scheduler {
    interval: Duration,
    shutdown: CancellationToken,
}

impl Scheduler {
    pub fn new(interval: Duration, shutdown: CancellationToken) -> Self {
        Self { interval, shutdown }
    }

    pub fn spawn(self, job: Arc<dyn ScheduledJob>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(job.as_ref()).await })
    }

    /// First pass fires one full interval after start
    pub async fn run(&self, job: &dyn ScheduledJob) {
        tracing::info!(
            "Starting scheduled job '{}' every {:?}",
            job.name(),
            self.interval
        );

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tracing::info!("Running scheduled job '{}'", job.name());
            if let Err(e) = job.run(&self.shutdown).await {
                tracing::error!("Scheduled job '{}' failed: {:?}", job.name(), e);
            }
        }

        tracing::info!("Scheduled job '{}' stopped", job.name());
    }
}
