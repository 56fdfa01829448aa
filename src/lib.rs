//! # weatherlake
//!
//! A single-shot extract-and-load pipeline: fetch the current weather
//! observation for a fixed location from the Weatherstack API and persist
//! it as a gzip-compressed Parquet object in S3-compatible object storage.
//!
//! ## Flow
//!
//! ```text
//! environment ──▶ settings ──▶ request URL ──▶ HTTP GET ──▶ WeatherRecord
//!                                                               │
//!                         RecordBatch ◀── one-row columnar ◀────┘
//!                              │
//!                              ▼
//!                    gzip Parquet bytes ──▶ put s3://bucket/prefix/YYYYMMDD.parquet.gzip
//! ```
//!
//! Every step is fallible and every failure is fatal: there are no retries
//! and no partial-write recovery. The binary logs whatever error reaches
//! the top and terminates normally.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

/// Error types for the pipeline
pub mod error;

/// Environment configuration
pub mod settings;

/// API extraction
pub mod extract;

/// Columnar output and object storage
pub mod output;

/// Run orchestration
pub mod pipeline;

/// Diagnostic logging setup
pub mod logging;

pub use error::{Error, Result};
pub use extract::WeatherRecord;
pub use settings::Settings;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
