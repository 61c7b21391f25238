use earth_wallpapers::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    if let Err(err) = logging::init_logging() {
        eprintln!("earth-wallpapers: {err}");
    }

    // Parse CLI and dispatch.
    if let Err(err) = Cli::run_from_args().await {
        eprintln!("earth-wallpapers error: {:#}", err);
        std::process::exit(1);
    }
}
