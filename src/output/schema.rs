//! JSON to Arrow conversion
//!
//! Builds a one-row RecordBatch from a weather record. Each top-level JSON
//! key becomes a column; nested objects become Struct columns and arrays
//! become List columns. All columns are nullable.

use crate::error::Result;
use crate::extract::WeatherRecord;
use arrow::error::ArrowError;
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray, NullArray, StringArray,
    StructArray,
};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use serde_json::Value;
use std::sync::Arc;

/// Convert a weather record to a single-row Arrow RecordBatch.
///
/// Column order follows the record's key order, so the schema is
/// deterministic for a given payload.
pub fn record_to_batch(record: &WeatherRecord) -> Result<RecordBatch> {
    let mut fields: Vec<Field> = Vec::new();
    let mut columns: Vec<ArrayRef> = Vec::new();

    for (name, value) in record.iter() {
        let data_type = data_type_of(value);
        columns.push(build_array(&[Some(value)], &data_type)?);
        fields.push(Field::new(name, data_type, true));
    }

    let schema = Arc::new(Schema::new(fields));
    let options = RecordBatchOptions::new().with_row_count(Some(1));
    let batch = RecordBatch::try_new_with_options(schema, columns, &options)?;
    Ok(batch)
}

/// Infer the Arrow DataType for a JSON value
fn data_type_of(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) => {
            if n.is_i64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        Value::String(_) => DataType::Utf8,
        Value::Array(items) => {
            // Element type comes from the first non-null element
            let element_type = items
                .iter()
                .find(|v| !v.is_null())
                .map_or(DataType::Null, data_type_of);
            DataType::List(Arc::new(Field::new("item", element_type, true)))
        }
        Value::Object(map) => {
            let fields: Vec<Field> = map
                .iter()
                .map(|(k, v)| Field::new(k, data_type_of(v), true))
                .collect();
            DataType::Struct(Fields::from(fields))
        }
    }
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Null => Ok(Arc::new(NullArray::new(values.len()))),

        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| {
                    v.map(|v| match v {
                        Value::String(s) => s.clone(),
                        _ => v.to_string(),
                    })
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::List(field) => build_list_array(values, field),

        DataType::Struct(fields) => build_struct_array(values, fields),

        // Fall back to a string representation
        _ => {
            let arr: StringArray = values.iter().map(|v| v.map(ToString::to_string)).collect();
            Ok(Arc::new(arr))
        }
    }
}

/// Build a list array from JSON arrays
fn build_list_array(values: &[Option<&Value>], field: &Arc<Field>) -> Result<ArrayRef> {
    let mut items: Vec<Option<&Value>> = Vec::new();
    let mut offsets: Vec<i32> = vec![0];

    for value in values {
        if let Some(Value::Array(elements)) = value {
            items.extend(elements.iter().map(Some));
        }
        let offset = i32::try_from(items.len())
            .map_err(|_| ArrowError::ComputeError("array too large for i32 offsets".to_string()))?;
        offsets.push(offset);
    }

    let child = build_array(&items, field.data_type())?;
    let list = ListArray::new(Arc::clone(field), OffsetBuffer::new(offsets.into()), child, None);
    Ok(Arc::new(list))
}

/// Build a struct array from JSON objects
fn build_struct_array(values: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let mut children: Vec<ArrayRef> = Vec::new();

    for field in fields {
        let child_values: Vec<Option<&Value>> = values
            .iter()
            .map(|v| {
                v.and_then(|v| {
                    if let Value::Object(map) = v {
                        map.get(field.name())
                    } else {
                        None
                    }
                })
            })
            .collect();
        children.push(build_array(&child_values, field.data_type())?);
    }

    Ok(Arc::new(StructArray::new(fields.clone(), children, None)))
}
