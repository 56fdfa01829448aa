//! Process configuration
//!
//! The pipeline is configured entirely through the process environment.
//! Both variables are required; an unset or empty value is a fatal
//! configuration error raised before any network activity.

use crate::error::{Error, Result};
use tracing::info;

/// Environment variable holding the Weatherstack access key
pub const ENV_API_KEY: &str = "WEATHERSTACK_API_KEY";

/// Environment variable holding the destination bucket name
pub const ENV_BUCKET: &str = "S3_BUCKET_NAME";

/// Resolved pipeline configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// Weatherstack API access key, passed as a query parameter
    pub api_key: String,
    /// Destination S3 bucket name
    pub bucket: String,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        let settings = Self::from_lookup(|name| std::env::var(name).ok())?;
        info!("environment variables loaded successfully");
        Ok(settings)
    }

    /// Load settings through an injected variable lookup
    ///
    /// Tests use this to avoid mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = require(&lookup, ENV_API_KEY)?;
        let bucket = require(&lookup, ENV_BUCKET)?;
        Ok(Self { api_key, bucket })
    }
}

fn require<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::missing_env(name)),
    }
}
