//! Periodic, unattended acquisition.
//!
//! The [`Scheduler`] owns at most one recurring timer task. Enabling spawns it,
//! disabling cancels it; both are idempotent. Each tick runs the acquisition
//! pipeline inside the timer task and only logs the result.
//!
//! Disabling stops future ticks but never interrupts a run that is already in
//! progress: cancellation is only observed between runs.
//!
//! # Example
//!
//! ```no_run
//! use earth_wallpapers::config::Config;
//! use earth_wallpapers::pipeline::{AcquisitionPipeline, build_http_client};
//! use earth_wallpapers::scheduler::Scheduler;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);
//! let client = build_http_client(&config.feed)?;
//! let pipeline = Arc::new(AcquisitionPipeline::new(&config, client, event_tx.clone()));
//!
//! let scheduler = Scheduler::new(pipeline, config.schedule.interval, event_tx);
//! scheduler.enable();
//! assert!(scheduler.is_enabled());
//! scheduler.disable();
//! # Ok(())
//! # }
//! ```

use crate::pipeline::AcquisitionPipeline;
use crate::types::Event;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Handle to the running timer task
struct TimerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl TimerHandle {
    fn release(self) {
        self.cancel.cancel();
        // Detach: an in-flight run finishes on its own.
        drop(self.task);
    }
}

/// Recurring trigger for the acquisition pipeline
pub struct Scheduler {
    pipeline: Arc<AcquisitionPipeline>,
    interval: Duration,
    timer: Mutex<Option<TimerHandle>>,
    runtime: Handle,
    event_tx: broadcast::Sender<Event>,
}

impl Scheduler {
    /// Creates a disabled scheduler
    ///
    /// Must be called from within a tokio runtime. The timer task is spawned on
    /// that runtime, so `enable` and `disable` work from any thread afterwards.
    pub fn new(
        pipeline: Arc<AcquisitionPipeline>,
        interval: Duration,
        event_tx: broadcast::Sender<Event>,
    ) -> Self {
        Self {
            pipeline,
            interval,
            timer: Mutex::new(None),
            runtime: Handle::current(),
            event_tx,
        }
    }

    /// Time between runs
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the timer is running
    pub fn is_enabled(&self) -> bool {
        self.lock().is_some()
    }

    /// Start the recurring timer
    ///
    /// The first run happens one interval from now. Does nothing if already
    /// enabled. Safe to call from threads outside the runtime.
    ///
    /// Returns `true` if the scheduler was switched on by this call.
    pub fn enable(&self) -> bool {
        let mut timer = self.lock();
        if timer.is_some() {
            debug!("scheduler already enabled");
            return false;
        }

        let cancel = CancellationToken::new();
        let task = self.runtime.spawn(run_timer(
            self.pipeline.clone(),
            self.interval,
            cancel.clone(),
        ));
        *timer = Some(TimerHandle { cancel, task });
        drop(timer);

        info!(interval = ?self.interval, "scheduler enabled");
        self.event_tx.send(Event::ScheduleChanged { enabled: true }).ok();
        true
    }

    /// Stop the recurring timer
    ///
    /// Does nothing if already disabled. A run in progress completes normally.
    ///
    /// Returns `true` if the scheduler was switched off by this call.
    pub fn disable(&self) -> bool {
        let Some(handle) = self.lock().take() else {
            debug!("scheduler already disabled");
            return false;
        };
        handle.release();

        info!("scheduler disabled");
        self.event_tx.send(Event::ScheduleChanged { enabled: false }).ok();
        true
    }

    /// Enable or disable
    pub fn set_enabled(&self, enabled: bool) -> bool {
        if enabled {
            self.enable()
        } else {
            self.disable()
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<TimerHandle>> {
        // The guarded value is a plain handle; a panic elsewhere cannot leave it
        // half-updated, so a poisoned lock is still usable.
        self.timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.lock().take() {
            handle.release();
        }
    }
}

async fn run_timer(
    pipeline: Arc<AcquisitionPipeline>,
    period: Duration,
    cancel: CancellationToken,
) {
    info!("scheduler timer started");

    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                debug!("scheduled acquisition starting");
                let result = pipeline.run().await;
                info!(
                    downloaded = result.downloaded,
                    invalid = result.invalid,
                    summary = %result.summary,
                    "scheduled acquisition finished"
                );
            }
        }
    }

    info!("scheduler timer stopped");
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
