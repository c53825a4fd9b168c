use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::SchedulerConfig;
use crate::state::SharedState;

/// Background housekeeping. The only job today is the session sweep, which
/// bounds session-table growth; session validity never depends on it
/// because lookups check expiry themselves.
pub struct Scheduler {
    state: Arc<SharedState>,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    pub fn new(state: Arc<SharedState>, config: SchedulerConfig) -> Self {
        Self {
            state,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    /// Ask the scheduler loop to wind down after its current tick.
    pub async fn stop(&self) {
        *self.running.write().await = false;
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let state = Arc::clone(&state);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                prune_sessions(&state).await;
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_hours = self.config.session_prune_interval_hours;

        info!("Scheduler pruning sessions every {} hours", interval_hours);

        let mut prune_interval = interval(Duration::from_secs(interval_hours * 60 * 60));
        // The first tick fires immediately; use it to clear anything that
        // expired while the process was down.
        loop {
            prune_interval.tick().await;

            if !*self.running.read().await {
                break;
            }

            prune_sessions(&self.state).await;
        }

        Ok(())
    }
}

async fn prune_sessions(state: &SharedState) {
    match state.store.prune_expired_sessions().await {
        Ok(0) => {}
        Ok(pruned) => info!("Pruned {pruned} expired session(s)"),
        Err(e) => error!("Session pruning failed: {e}"),
    }
}
