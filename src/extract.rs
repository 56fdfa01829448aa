//! Weather data extraction
//!
//! Builds the Weatherstack request URL and performs the single HTTP GET of a
//! pipeline run. There are no retries and no client-side timeout: the run
//! either gets a payload or fails.

use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::error;
use url::Url;

/// Weatherstack current-conditions endpoint
pub const API_ENDPOINT: &str = "https://api.weatherstack.com/current";

/// Location queried on every run
pub const LOCATION_QUERY: &str = "New Delhi, India";

/// One raw API response: the top-level JSON object, untyped.
///
/// Values are heterogeneous (numbers, strings, nested objects) and are
/// carried through to the columnar output as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherRecord(Map<String, Value>);

impl WeatherRecord {
    /// True when the API returned no usable payload
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the top-level fields in key order
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.0.iter()
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for WeatherRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Build the API request URL for the fixed location query.
///
/// Pure: the same access key always yields the same URL. Both query
/// parameters are form-encoded, so keys containing reserved characters
/// produce a valid request.
pub fn prepare_request(api_key: &str) -> Result<Url> {
    let url = Url::parse_with_params(
        API_ENDPOINT,
        &[("access_key", api_key), ("query", LOCATION_QUERY)],
    )?;
    Ok(url)
}

/// Fetch the current weather payload from the API.
///
/// Performs one GET against `url`, validates the status, and parses the
/// body. A `null` body parses to an empty record; the caller treats that as
/// "no data received". Any transport failure or non-2xx status is fatal.
pub async fn extract_data(client: &Client, url: Url) -> Result<WeatherRecord> {
    let response = client.get(url).send().await.map_err(|e| {
        error!("error fetching data: {e}");
        Error::Http(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), "weather API returned an error status");
        return Err(Error::http_status(status.as_u16(), body));
    }

    let body = response.text().await.map_err(|e| {
        error!("error reading response body: {e}");
        Error::Http(e)
    })?;
    let payload: Value = serde_json::from_str(&body).map_err(|e| {
        error!("error parsing response body: {e}");
        Error::JsonParse(e)
    })?;

    match payload {
        Value::Null => Ok(WeatherRecord::default()),
        Value::Object(map) => Ok(WeatherRecord::from(map)),
        other => {
            error!("unexpected response payload shape");
            Err(Error::decode(format!(
                "expected a JSON object, got: {other}"
            )))
        }
    }
}
