//! The collaborator-facing handle.
//!
//! [`WallpaperManager`] wires the acquisition pipeline, the scheduler and the
//! rotator to a single event channel. A UI (menu bar, CLI, tray icon) only talks
//! to this type.

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{AcquisitionPipeline, build_http_client};
use crate::rotation::Rotator;
use crate::scheduler::Scheduler;
use crate::types::{AcquisitionResult, Event, RotationOutcome};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Main wallpaper manager instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct WallpaperManager {
    /// Configuration the manager was built from
    pub(crate) config: Arc<Config>,
    /// Shared acquisition pipeline (also driven by the scheduler)
    pub(crate) pipeline: Arc<AcquisitionPipeline>,
    /// Periodic acquisition timer
    pub(crate) scheduler: Arc<Scheduler>,
    /// External rotation command
    pub(crate) rotator: Arc<Rotator>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
}

impl WallpaperManager {
    /// Create a new manager
    ///
    /// This validates the configuration, builds the shared HTTP client and wires
    /// the pipeline, scheduler and rotator to one event channel. When
    /// `schedule.enabled_on_start` is set, the scheduler is switched on before
    /// returning.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] for unusable configuration and
    /// [`crate::Error::Other`] if the HTTP client cannot be built.
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        // Buffer 1000 events; slow subscribers lag instead of blocking the pipeline
        let (event_tx, _) = broadcast::channel(1000);

        let http_client = build_http_client(&config.feed)?;
        let pipeline = Arc::new(AcquisitionPipeline::new(
            &config,
            http_client,
            event_tx.clone(),
        ));
        let scheduler = Arc::new(Scheduler::new(
            pipeline.clone(),
            config.schedule.interval,
            event_tx.clone(),
        ));
        let rotator = Arc::new(Rotator::new(config.rotation.clone()));

        tracing::info!(
            wallpaper_dir = %pipeline.accepted_dir().display(),
            invalid_dir = %pipeline.invalid_dir().display(),
            cache = %config.feed.cache_path.display(),
            "wallpaper manager ready"
        );

        if config.schedule.enabled_on_start {
            scheduler.enable();
        }

        Ok(Self {
            config: Arc::new(config),
            pipeline,
            scheduler,
            rotator,
            event_tx,
        })
    }

    /// Run one acquisition now
    ///
    /// Never fails: feed problems produce a zero-count result and per-item
    /// problems are reported through events.
    pub async fn trigger_acquisition(&self) -> AcquisitionResult {
        self.pipeline.run().await
    }

    /// Ask the OS to show the next wallpaper
    ///
    /// A user-cancelled prompt counts as success.
    ///
    /// # Errors
    ///
    /// Returns the rotation failure, which is also broadcast as
    /// [`Event::RotationFailed`].
    pub async fn trigger_rotation(&self) -> Result<()> {
        match self.rotator.rotate().await {
            Ok(RotationOutcome::Changed) | Ok(RotationOutcome::Cancelled) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "wallpaper rotation failed");
                self.event_tx
                    .send(Event::RotationFailed {
                        error: e.to_string(),
                    })
                    .ok();
                Err(e)
            }
        }
    }

    /// Switch periodic acquisition on or off
    ///
    /// Idempotent; returns `true` if the state changed.
    pub fn set_schedule_enabled(&self, enabled: bool) -> bool {
        self.scheduler.set_enabled(enabled)
    }

    /// Whether periodic acquisition is on
    pub fn schedule_enabled(&self) -> bool {
        self.scheduler.is_enabled()
    }

    /// Subscribe to pipeline, schedule and rotation events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stop background work
    ///
    /// Disables the scheduler. A run already in progress is left to finish.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutting down wallpaper manager");
        self.scheduler.disable();
        Ok(())
    }
}
