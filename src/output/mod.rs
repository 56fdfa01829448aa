//! Output module
//!
//! Turns one extracted record into a compressed columnar object:
//! Arrow RecordBatch creation, in-memory Parquet encoding, and the
//! object-storage put.

mod schema;
mod store;
mod writer;

pub use schema::record_to_batch;
pub use store::{object_key, WeatherStore, DEFAULT_PREFIX};
pub use writer::batch_to_parquet_gzip;

#[cfg(test)]
mod tests;
