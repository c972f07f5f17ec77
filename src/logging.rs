use std::fs::File;
use std::io;
use std::sync::Arc;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Send `tracing` output to the configured log file so it never lands on
/// the terminal the UI is drawing to. `RUST_LOG` overrides the configured
/// level.
///
/// Returns `false`, keeping the existing one, if a subscriber is already
/// installed.
pub fn init(config: &LogConfig) -> io::Result<bool> {
    let file = File::create(&config.file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();

    match installed {
        Ok(()) => Ok(true),
        Err(err) => {
            debug!(error = %err, file = %config.file.display(), "subscriber already installed");
            Ok(false)
        }
    }
}
