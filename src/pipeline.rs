//! Run orchestration
//!
//! One strictly linear pass per invocation: load settings, build the
//! request, extract, check for an empty payload, then load into object
//! storage. The store is constructed only once a non-empty record exists,
//! so credential failures surface during the load step.

use crate::error::{Error, Result};
use crate::extract::{extract_data, prepare_request};
use crate::output::{WeatherStore, DEFAULT_PREFIX};
use crate::settings::Settings;
use reqwest::Client;
use tracing::error;
use url::Url;

/// Run the pipeline once against the real API and S3 destination.
///
/// Returns the object key written on success.
pub async fn run() -> Result<String> {
    let settings = Settings::from_env()?;
    let url = prepare_request(&settings.api_key)?;
    let client = Client::new();

    extract_and_load(&client, url, || {
        WeatherStore::s3(&settings.bucket, DEFAULT_PREFIX)
    })
    .await
}

/// Extract from `url` and load into the store produced by `make_store`.
///
/// The factory defers store construction until after extraction, and lets
/// tests substitute a local store.
pub async fn extract_and_load<F>(client: &Client, url: Url, make_store: F) -> Result<String>
where
    F: FnOnce() -> Result<WeatherStore>,
{
    let record = extract_data(client, url).await?;
    if record.is_empty() {
        error!("no data received from the API");
        return Err(Error::EmptyResponse);
    }

    let store = make_store()?;
    store.save_record(&record).await
}
