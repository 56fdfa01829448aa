//! In-memory Parquet encoding
//!
//! The object is uploaded straight from memory, so the writer targets a
//! byte buffer rather than a file.

use crate::error::Result;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;

/// Serialize a RecordBatch to Parquet bytes with gzip page compression
pub fn batch_to_parquet_gzip(batch: &RecordBatch) -> Result<Bytes> {
    let props = WriterProperties::builder()
        .set_compression(Compression::GZIP(GzipLevel::default()))
        .build();

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    Ok(Bytes::from(buffer))
}
