//! Command line front end for the wallpaper manager.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use earth_wallpapers::{AcquisitionResult, Config, WallpaperManager, run_with_shutdown};
use std::path::{Path, PathBuf};

/// Top-level CLI for earth-wallpapers.
#[derive(Debug, Parser)]
#[command(name = "earth-wallpapers")]
#[command(about = "Fetch landscape wallpapers and rotate the desktop", long_about = None)]
pub struct Cli {
    /// TOML configuration file (defaults are used when omitted).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download new wallpapers once and print a summary.
    Fetch,

    /// Ask the OS to show the next wallpaper.
    Next,

    /// Keep running and fetch on the configured interval until interrupted.
    Watch {
        /// Run one acquisition immediately instead of waiting a full interval.
        #[arg(long)]
        now: bool,
    },
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", config);

        let manager = WallpaperManager::new(config).await?;

        match cli.command {
            CliCommand::Fetch => {
                let result = manager.trigger_acquisition().await;
                println!("{}", report(&result));
            }
            CliCommand::Next => manager.trigger_rotation().await?,
            CliCommand::Watch { now } => {
                if now {
                    let result = manager.trigger_acquisition().await;
                    println!("{}", report(&result));
                }
                manager.set_schedule_enabled(true);
                run_with_shutdown(manager).await?;
            }
        }

        Ok(())
    }
}

/// Load configuration from `path`, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// One-line, user-facing summary of a run.
fn report(result: &AcquisitionResult) -> String {
    if result.downloaded == 0 {
        "No new wallpapers".to_string()
    } else {
        result.summary.clone()
    }
}
