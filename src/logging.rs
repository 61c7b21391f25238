use crate::error::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr.
///
/// `RUST_LOG` overrides the default filter of `info,earth_wallpapers=debug`.
pub fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,earth_wallpapers=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::Other(format!("failed to initialize logging: {}", e)))?;

    tracing::debug!("earth-wallpapers logging initialized");
    Ok(())
}
