//! Diagnostic logging
//!
//! One console sink and one append-mode file sink, both emitting structured
//! lines with level, target, and source location. Initialized exactly once
//! at process start; a second call is a configuration error.

use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Directory holding the pipeline log file
pub const LOG_DIR: &str = "logs";

/// Log file name within [`LOG_DIR`]
pub const LOG_FILE: &str = "weatherlake.log";

/// Install the global subscriber with console and file sinks.
///
/// The filter defaults to INFO and honors `RUST_LOG` overrides.
pub fn init() -> Result<()> {
    std::fs::create_dir_all(LOG_DIR)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(LOG_DIR).join(LOG_FILE))?;

    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_file(true).with_line_number(true))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(Arc::new(file)),
        )
        .try_init()
        .map_err(|e| Error::config(format!("failed to initialize logging: {e}")))?;

    Ok(())
}
