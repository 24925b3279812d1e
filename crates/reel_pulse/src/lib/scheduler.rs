//! Fires pipeline runs at fixed wall-clock times in a fixed timezone.
//!
//! Runs never overlap: each fire takes the run lock, and a fire that finds
//! a run still in flight is skipped.

use std::{future::Future, str::FromStr, sync::Arc};

use anyhow::Context;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{processor::RunReport, PipelineError};

pub type RunResult = Result<RunReport, PipelineError>;

#[derive(Debug, Clone)]
pub struct Scheduler {
    schedule: Schedule,
    timezone: Tz,
    run_lock: Arc<Mutex<()>>,
}

impl Scheduler {
    /// 07:00, 13:00 and 19:00 every day
    pub const DEFAULT_SCHEDULE: &str = "0 0 7,13,19 * * *";
    pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";

    pub fn new(schedule: Schedule, timezone: Tz) -> Self {
        Self {
            schedule,
            timezone,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Parses a six-field cron expression (with seconds) and an IANA timezone name
    pub fn parse(expression: &str, timezone: &str) -> anyhow::Result<Self> {
        let schedule = Schedule::from_str(expression)
            .with_context(|| format!("Invalid cron schedule `{expression}`"))?;
        let timezone = Tz::from_str(timezone)
            .map_err(|e| anyhow::anyhow!("Invalid timezone `{timezone}`: {e}"))?;
        Ok(Self::new(schedule, timezone))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// First fire time strictly after `after`, in the scheduler's timezone
    pub fn next_fire_after(&self, after: DateTime<Utc>) -> Option<DateTime<Tz>> {
        self.schedule
            .after(&after.with_timezone(&self.timezone))
            .next()
    }

    /// Runs `job` while holding the run lock.
    /// Returns `None` without running it if another run is in flight.
    pub async fn fire<F, Fut>(&self, job: F) -> Option<RunResult>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RunResult>,
    {
        fire_locked(&self.run_lock, job).await
    }

    /// Fires `job` at every scheduled time until `shutdown` is cancelled.
    ///
    /// Each run is spawned so a slow run cannot delay the clock; a failed
    /// run is logged and the loop keeps waiting for the next fire time. On
    /// shutdown, a run in flight is allowed to finish.
    pub async fn run<F, Fut>(&self, job: F, shutdown: CancellationToken)
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = RunResult> + Send + 'static,
    {
        let mut last_fire = Utc::now();

        loop {
            let now = Utc::now().max(last_fire);
            let Some(next) = self.next_fire_after(now) else {
                tracing::warn!("Schedule has no upcoming fire times");
                break;
            };
            let next_utc = next.with_timezone(&Utc);
            let wait = (next_utc - Utc::now()).to_std().unwrap_or_default();
            tracing::info!(next = %next, "Waiting for next scheduled run");

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
            last_fire = next_utc;

            let run_lock = self.run_lock.clone();
            let job = job.clone();
            tokio::spawn(async move {
                fire_locked(&run_lock, job).await;
            });
        }

        tracing::info!("Scheduler stopping");
        let _idle = self.run_lock.lock().await;
    }
}

async fn fire_locked<F, Fut>(run_lock: &Mutex<()>, job: F) -> Option<RunResult>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = RunResult>,
{
    let Ok(_guard) = run_lock.try_lock() else {
        tracing::warn!("Previous run still in progress, skipping this one");
        return None;
    };

    let result = job().await;
    match &result {
        Ok(report) => tracing::info!(word = %report.word, media_id = %report.published_id, "Scheduled run succeeded"),
        Err(e) => tracing::error!(error = %e, "Scheduled run failed"),
    }
    Some(result)
}
