//! # earth-wallpapers
//!
//! Keeps a local folder of high-resolution landscape wallpapers in sync with a
//! public image feed, and asks the OS to rotate to the next one.
//!
//! ## Design Philosophy
//!
//! earth-wallpapers is designed to be:
//! - **Idempotent** - A second run against an unchanged feed downloads nothing
//! - **Failure-tolerant** - Feed problems yield an empty run, item problems stay local to the item
//! - **Explicitly configured** - Every path and threshold lives in [`Config`]
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use earth_wallpapers::{Config, WallpaperManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = WallpaperManager::new(Config::default()).await?;
//!
//!     // Subscribe to events
//!     let mut events = manager.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let result = manager.trigger_acquisition().await;
//!     println!("{}", result.summary);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Remote feed cache and listing parser
pub mod feed;
/// Tracing subscriber setup
pub mod logging;
/// Collaborator-facing manager
pub mod manager;
/// One acquisition run: fetch, filter, download, validate, sort
pub mod pipeline;
/// External wallpaper rotation
pub mod rotation;
/// Periodic acquisition
pub mod scheduler;
/// "Already processed" lookups
pub mod seen;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;
/// Image geometry checks
pub mod validator;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::Config;
pub use error::{DecodeError, Error, FetchError, FilesystemError, Result, RotationError};
pub use feed::{CacheStatus, CandidatePost, FeedCache};
pub use manager::WallpaperManager;
pub use pipeline::AcquisitionPipeline;
pub use rotation::Rotator;
pub use scheduler::Scheduler;
pub use seen::{DirectorySeenIndex, SeenIndex};
pub use types::{AcquisitionResult, Event, RotationOutcome, SkipReason};
pub use validator::{Classification, InvalidReason};

/// Run until the process is asked to stop, then shut the manager down.
///
/// On Unix this waits for SIGTERM or SIGINT; elsewhere, and when signal handlers
/// cannot be installed, it waits for Ctrl+C.
///
/// # Example
///
/// ```no_run
/// use earth_wallpapers::{Config, WallpaperManager, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let manager = WallpaperManager::new(Config::default()).await?;
///     manager.set_schedule_enabled(true);
///     run_with_shutdown(manager).await?;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(manager: WallpaperManager) -> Result<()> {
    wait_for_signal().await;
    manager.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("received SIGTERM"),
                _ = sigint.recv() => tracing::info!("received SIGINT"),
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "could not register signal handlers, waiting for Ctrl+C");
            wait_for_ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received Ctrl+C"),
        Err(e) => tracing::error!(error = %e, "failed to listen for Ctrl+C"),
    }
}
