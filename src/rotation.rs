//! External wallpaper rotation.
//!
//! Rotation is delegated to an OS command (by default `osascript` running a short
//! AppleScript). The command has two recognised outcomes: success, and the user
//! dismissing the prompt, which prints `User canceled.` and exits non-zero. Any
//! other failure is reported as a [`RotationError`].

use crate::config::RotationConfig;
use crate::error::{Error, Result, RotationError};
use crate::types::RotationOutcome;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

/// Marker printed by AppleScript when the user cancels
const USER_CANCELLED_MARKER: &str = "User canceled.";

/// Runs the configured rotation command
#[derive(Clone, Debug)]
pub struct Rotator {
    config: RotationConfig,
}

impl Rotator {
    /// Create a rotator for the given command
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    /// Resolve the program on `PATH`
    ///
    /// `None` when the program cannot be found, e.g. `osascript` off macOS.
    pub fn resolve_program(&self) -> Option<PathBuf> {
        which::which(&self.config.program).ok()
    }

    /// Ask the OS to move to the next wallpaper
    ///
    /// # Errors
    /// - [`Error::NotSupported`] if the program is not installed
    /// - [`Error::Rotation`] if the command fails, cannot be spawned or times out
    pub async fn rotate(&self) -> Result<RotationOutcome> {
        let program_name = self.config.program.display().to_string();
        let Some(program) = self.resolve_program() else {
            return Err(Error::NotSupported(format!(
                "rotation command '{}' not found",
                program_name
            )));
        };

        debug!(program = %program.display(), "running rotation command");
        let result = tokio::time::timeout(
            self.config.timeout,
            Command::new(&program)
                .args(&self.config.args)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(RotationError::Spawn {
                    program: program_name,
                    source,
                }
                .into());
            }
            Err(_) => {
                return Err(RotationError::TimedOut {
                    program: program_name,
                    timeout_secs: self.config.timeout.as_secs(),
                }
                .into());
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let pretty = combined.replace('\n', "").trim().to_string();

        if output.status.success() {
            info!(output = %pretty, "wallpaper rotated");
            return Ok(RotationOutcome::Changed);
        }
        if combined.contains(USER_CANCELLED_MARKER) {
            info!("rotation cancelled by user");
            return Ok(RotationOutcome::Cancelled);
        }

        Err(RotationError::Failed {
            program: program_name,
            exit: output.status.to_string(),
            output: pretty,
        }
        .into())
    }
}
