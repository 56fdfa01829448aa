//! Object storage destination
//!
//! Wraps an `ObjectStore` with the date-stamped key scheme. One object per
//! run; re-running within the same UTC day overwrites that day's object.

use super::schema::record_to_batch;
use super::writer::batch_to_parquet_gzip;
use crate::error::{Error, Result};
use crate::extract::WeatherRecord;
use bytes::Bytes;
use chrono::{NaiveDate, Utc};
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;
use tracing::{error, info};

/// Default key prefix for raw weather objects
pub const DEFAULT_PREFIX: &str = "weather_data_raw/";

/// Build the object key for a given UTC date.
///
/// Format: `{prefix}/{YYYYMMDD}.parquet.gzip`. A trailing slash on the
/// prefix is normalized away, so `weather_data_raw/` and `weather_data_raw`
/// produce the same key.
pub fn object_key(prefix: &str, date: NaiveDate) -> String {
    format!(
        "{}/{}.parquet.gzip",
        prefix.trim_end_matches('/'),
        date.format("%Y%m%d")
    )
}

/// Destination store for weather objects
#[derive(Debug, Clone)]
pub struct WeatherStore {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl WeatherStore {
    /// Create a store backed by an S3 bucket.
    ///
    /// Credentials, region, and endpoint come from the environment
    /// (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_DEFAULT_REGION`,
    /// ...). Missing or incomplete credentials are reported as a distinct
    /// error kind before the client is built.
    pub fn s3(bucket: &str, prefix: &str) -> Result<Self> {
        if let Err(e) = check_credentials(|name| std::env::var(name).ok()) {
            error!("{e}");
            return Err(e);
        }

        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::storage(format!("failed to create S3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: prefix.to_string(),
        })
    }

    /// Create a store over any `ObjectStore` implementation.
    ///
    /// Tests use this with a local filesystem store.
    pub fn with_store(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Serialize the record and put it under today's UTC key
    pub async fn save_record(&self, record: &WeatherRecord) -> Result<String> {
        self.save_record_on(record, Utc::now().date_naive()).await
    }

    /// Serialize the record and put it under the key for `date`
    pub async fn save_record_on(&self, record: &WeatherRecord, date: NaiveDate) -> Result<String> {
        let batch = record_to_batch(record)?;
        let data = batch_to_parquet_gzip(&batch)?;
        let key = object_key(&self.prefix, date);
        self.put_bytes(&key, data).await?;
        info!(%key, "data successfully saved to object storage");
        Ok(key)
    }

    async fn put_bytes(&self, key: &str, data: Bytes) -> Result<()> {
        let path = ObjectPath::from(key);
        self.store.put(&path, data.into()).await.map_err(|e| {
            error!("error saving data to object storage: {e}");
            Error::storage(format!("failed to write {path}: {e}"))
        })?;
        Ok(())
    }
}

/// Check that static AWS credentials are present in the environment.
///
/// Both variables unset means no credentials at all; exactly one set means
/// an incomplete pair. Either case fails before any client is constructed.
pub(crate) fn check_credentials<F>(lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let access_key = lookup("AWS_ACCESS_KEY_ID").filter(|v| !v.is_empty());
    let secret_key = lookup("AWS_SECRET_ACCESS_KEY").filter(|v| !v.is_empty());

    match (access_key, secret_key) {
        (Some(_), Some(_)) => Ok(()),
        (None, None) => Err(Error::storage_credentials(
            "AWS credentials not found; configure AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY",
        )),
        _ => Err(Error::storage_credentials(
            "incomplete AWS credentials; both AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set",
        )),
    }
}
