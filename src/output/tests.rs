//! Tests for the output module

use super::store::check_credentials;
use super::*;
use crate::extract::WeatherRecord;
use arrow::array::{Array, BooleanArray, Float64Array, Int64Array, StringArray, StructArray};
use arrow::datatypes::DataType;
use chrono::NaiveDate;
use object_store::local::LocalFileSystem;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn record(value: serde_json::Value) -> WeatherRecord {
    serde_json::from_value(value).unwrap()
}

fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

// ============================================================================
// Schema conversion
// ============================================================================

#[test]
fn test_record_to_batch_single_int_column() {
    let batch = record_to_batch(&record(json!({"temp": 20}))).unwrap();

    assert_eq!(batch.num_rows(), 1);
    assert_eq!(batch.num_columns(), 1);

    let temp = batch
        .column_by_name("temp")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(temp.value(0), 20);
}

#[test]
fn test_record_to_batch_scalar_types() {
    let batch = record_to_batch(&record(json!({
        "city": "New Delhi",
        "humidity": 0.62,
        "is_day": true,
        "observation": null
    })))
    .unwrap();

    assert_eq!(batch.num_rows(), 1);
    assert_eq!(batch.num_columns(), 4);

    let city = batch
        .column_by_name("city")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(city.value(0), "New Delhi");

    let humidity = batch
        .column_by_name("humidity")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert!((humidity.value(0) - 0.62).abs() < f64::EPSILON);

    let is_day = batch
        .column_by_name("is_day")
        .unwrap()
        .as_any()
        .downcast_ref::<BooleanArray>()
        .unwrap();
    assert!(is_day.value(0));

    let observation = batch.column_by_name("observation").unwrap();
    assert_eq!(observation.data_type(), &DataType::Null);
}

#[test]
fn test_record_to_batch_nested_object_becomes_struct() {
    let batch = record_to_batch(&record(json!({
        "location": {"name": "New Delhi", "lat": 28.6}
    })))
    .unwrap();

    let location = batch
        .column_by_name("location")
        .unwrap()
        .as_any()
        .downcast_ref::<StructArray>()
        .unwrap();

    let name = location
        .column_by_name("name")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(name.value(0), "New Delhi");

    let lat = location
        .column_by_name("lat")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert!((lat.value(0) - 28.6).abs() < f64::EPSILON);
}

#[test]
fn test_record_to_batch_array_becomes_list() {
    let batch = record_to_batch(&record(json!({
        "descriptions": ["Haze", "Smoke"]
    })))
    .unwrap();

    let descriptions = batch.column_by_name("descriptions").unwrap();
    assert!(matches!(descriptions.data_type(), DataType::List(_)));

    let list = descriptions
        .as_any()
        .downcast_ref::<arrow::array::ListArray>()
        .unwrap();
    let items = list.value(0);
    let items = items.as_any().downcast_ref::<StringArray>().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items.value(0), "Haze");
    assert_eq!(items.value(1), "Smoke");
}

// ============================================================================
// Parquet round-trip
// ============================================================================

#[test]
fn test_parquet_round_trip() {
    let batch = record_to_batch(&record(json!({"temp": 20}))).unwrap();
    let data = batch_to_parquet_gzip(&batch).unwrap();

    let reader = ParquetRecordBatchReaderBuilder::try_new(data)
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.collect::<std::result::Result<_, _>>().unwrap();

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].num_rows(), 1);

    let temp = batches[0]
        .column_by_name("temp")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(temp.value(0), 20);
}

// ============================================================================
// Object keys
// ============================================================================

#[test]
fn test_object_key_format() {
    let key = object_key("weather_data_raw/", fixed_date());
    assert_eq!(key, "weather_data_raw/20240102.parquet.gzip");
}

#[test]
fn test_object_key_prefix_normalization() {
    assert_eq!(
        object_key("weather_data_raw", fixed_date()),
        object_key("weather_data_raw/", fixed_date())
    );
}

#[test]
fn test_object_key_idempotent_within_day() {
    let first = object_key(DEFAULT_PREFIX, fixed_date());
    let second = object_key(DEFAULT_PREFIX, fixed_date());
    assert_eq!(first, second);

    let next_day = object_key(DEFAULT_PREFIX, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    assert_ne!(first, next_day);
}

// ============================================================================
// Store
// ============================================================================

#[tokio::test]
async fn test_save_record_writes_one_object() {
    let temp_dir = tempfile::tempdir().unwrap();
    let local = LocalFileSystem::new_with_prefix(temp_dir.path()).unwrap();
    let store = WeatherStore::with_store(Arc::new(local), DEFAULT_PREFIX);

    let key = store
        .save_record_on(&record(json!({"temp": 20})), fixed_date())
        .await
        .unwrap();
    assert_eq!(key, "weather_data_raw/20240102.parquet.gzip");

    let object = temp_dir
        .path()
        .join("weather_data_raw")
        .join("20240102.parquet.gzip");
    let data = bytes::Bytes::from(std::fs::read(&object).unwrap());

    let reader = ParquetRecordBatchReaderBuilder::try_new(data)
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.collect::<std::result::Result<_, _>>().unwrap();
    assert_eq!(batches.len(), 1);

    let temp = batches[0]
        .column_by_name("temp")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(temp.value(0), 20);
}

#[tokio::test]
async fn test_save_record_overwrites_same_day() {
    let temp_dir = tempfile::tempdir().unwrap();
    let local = LocalFileSystem::new_with_prefix(temp_dir.path()).unwrap();
    let store = WeatherStore::with_store(Arc::new(local), DEFAULT_PREFIX);

    let first = store
        .save_record_on(&record(json!({"temp": 20})), fixed_date())
        .await
        .unwrap();
    let second = store
        .save_record_on(&record(json!({"temp": 25})), fixed_date())
        .await
        .unwrap();
    assert_eq!(first, second);

    let dir = temp_dir.path().join("weather_data_raw");
    let objects: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
    assert_eq!(objects.len(), 1);
}

// ============================================================================
// Credentials
// ============================================================================

#[test]
fn test_check_credentials_both_present() {
    let lookup = |name: &str| match name {
        "AWS_ACCESS_KEY_ID" => Some("AKIA123".to_string()),
        "AWS_SECRET_ACCESS_KEY" => Some("secret".to_string()),
        _ => None,
    };
    assert!(check_credentials(lookup).is_ok());
}

#[test]
fn test_check_credentials_none_present() {
    let err = check_credentials(|_| None).unwrap_err();
    assert!(err.is_credential_error());
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_check_credentials_incomplete() {
    let lookup = |name: &str| match name {
        "AWS_ACCESS_KEY_ID" => Some("AKIA123".to_string()),
        _ => None,
    };
    let err = check_credentials(lookup).unwrap_err();
    assert!(err.is_credential_error());
    assert!(err.to_string().contains("incomplete"));
}
