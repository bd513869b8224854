/// The daily reminder loop
///
/// Sleeps until the configured wall-clock hour, then walks every
/// registered user: tasks due today and not done get a digest email.
/// A per-user failure (query or delivery) is logged and skipped; the
/// run continues with the remaining users.
///
/// There is no persisted "already sent" marker: delivery is
/// at-most-once per run, and re-running on the same day re-sends.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskflow_reminder::mailer::{MockMailer, Mailer};
/// use taskflow_reminder::scheduler::ReminderScheduler;
/// use taskflow_shared::store::{MemStore, Store};
///
/// # async fn example() -> anyhow::Result<()> {
/// let store: Arc<dyn Store> = Arc::new(MemStore::new());
/// let mailer: Arc<dyn Mailer> = Arc::new(MockMailer::new());
///
/// let scheduler = ReminderScheduler::new(store, mailer);
/// let shutdown = scheduler.shutdown_token();
/// tokio::spawn(async move { scheduler.run().await });
/// // ... later
/// shutdown.cancel();
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::digest::compose_digest;
use crate::mailer::Mailer;
use taskflow_shared::store::Store;

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Local wall-clock hour to fire at (0-23)
    pub hour: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        // 8:00 AM
        SchedulerConfig { hour: 8 }
    }
}

/// Outcome of a single digest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Users who received a digest
    pub sent: usize,

    /// Users skipped because a query or send failed
    pub failed: usize,
}

/// Daily digest scheduler
#[derive(Clone)]
pub struct ReminderScheduler {
    store: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
    config: SchedulerConfig,
    shutdown: CancellationToken,
}

impl ReminderScheduler {
    /// Creates a scheduler firing at the default hour
    pub fn new(store: Arc<dyn Store>, mailer: Arc<dyn Mailer>) -> Self {
        Self::with_config(store, mailer, SchedulerConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            mailer,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token for signalling graceful shutdown
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Runs the daily loop until shutdown
    pub async fn run(&self) -> anyhow::Result<()> {
        tracing::info!(hour = self.config.hour, "Reminder scheduler started");

        loop {
            let wait = time_until_next_run(Local::now(), self.config.hour);
            tracing::debug!(seconds = wait.as_secs(), "Sleeping until next digest run");

            tokio::select! {
                _ = sleep(wait) => {
                    let today = Local::now().date_naive();
                    let summary = self.run_once(today).await;
                    tracing::info!(
                        date = %today,
                        sent = summary.sent,
                        failed = summary.failed,
                        "Digest run finished"
                    );
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Reminder scheduler shutting down");
                    return Ok(());
                }
            }
        }
    }

    /// Dispatches digests for every user with tasks due on `date`
    ///
    /// Public so tests and the manual trigger endpoint can run a
    /// digest pass without waiting for the wall clock.
    pub async fn run_once(&self, date: NaiveDate) -> RunSummary {
        let mut summary = RunSummary::default();

        let users = match self.store.list_users().await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!(error = %e, "Digest run aborted: cannot list users");
                return summary;
            }
        };

        for user in users {
            let tasks = match self.store.tasks_due_on(user.id, date).await {
                Ok(tasks) => tasks,
                Err(e) => {
                    tracing::warn!(user_id = user.id, error = %e, "Skipping user: due-task query failed");
                    summary.failed += 1;
                    continue;
                }
            };

            if tasks.is_empty() {
                continue;
            }

            let email = compose_digest(&user, date, &tasks);
            match self.mailer.send(&email).await {
                Ok(()) => {
                    tracing::info!(
                        user_id = user.id,
                        tasks = tasks.len(),
                        transport = self.mailer.name(),
                        "Sent daily digest"
                    );
                    summary.sent += 1;
                }
                Err(e) => {
                    // One bad mailbox must not starve the rest
                    tracing::warn!(user_id = user.id, error = %e, "Digest delivery failed");
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}

/// Time remaining until the next occurrence of `hour:00` local time
fn time_until_next_run(now: DateTime<Local>, hour: u32) -> Duration {
    let fire_at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);

    let mut target = now.date_naive().and_time(fire_at);
    if now.naive_local() >= target {
        target += chrono::Duration::days(1);
    }

    (target - now.naive_local())
        .to_std()
        .unwrap_or(Duration::from_secs(60))
}
