//! Weather extraction entry point
//!
//! Runs the pipeline once. Every failure is logged and the process
//! terminates normally; success and failure are observable through the log
//! output only.

use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = weatherlake::logging::init() {
        eprintln!("Error: {e}");
        return;
    }

    info!("starting the weather data extraction run");
    match weatherlake::pipeline::run().await {
        Ok(key) => info!(%key, "weather data extraction run finished"),
        Err(e) => error!("an error occurred in the extraction run: {e}"),
    }
}
