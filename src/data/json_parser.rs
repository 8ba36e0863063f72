//! JSON data parsing
//!
//! Parses JSON arrays of objects (optionally wrapped in a `data`/`rows`/...
//! key) into a [`Dataset`]. Column order follows the first object.

use crate::constants::JSON_WRAPPER_KEYS;
use crate::data::dataset::{Cell, Dataset};
use crate::data::error::{DataError, DataResult};
use crate::data::frame_loader::check_file_size;
use serde_json::Value;
use std::path::Path;

/// Parse a JSON file into a Dataset
pub fn parse_json_file(path: &Path) -> DataResult<Dataset> {
    check_file_size(path)?;
    let content = std::fs::read_to_string(path)?;

    let mut ds = parse_json_content(&content)?;
    ds.name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Data")
        .to_string();
    ds.source = Some(path.to_path_buf());

    Ok(ds)
}

/// Parse JSON content from a string
pub fn parse_json_content(json: &str) -> DataResult<Dataset> {
    let value: Value = serde_json::from_str(json)?;
    let array = extract_array(&value)?;

    let Some(first) = array.first() else {
        return Ok(Dataset::new(vec![], vec![]));
    };

    let first_obj = first.as_object().ok_or_else(|| {
        DataError::InvalidData("Array elements must be objects".to_string())
    })?;
    let headers: Vec<String> = first_obj.keys().cloned().collect();

    let rows = array
        .iter()
        .filter_map(|v| {
            let obj = v.as_object()?;
            Some(
                headers
                    .iter()
                    .map(|name| obj.get(name).map(json_value_to_cell).unwrap_or(Cell::Empty))
                    .collect(),
            )
        })
        .collect();

    Ok(Dataset::new(headers, rows))
}

/// Extract the array from JSON value, handling common wrapper patterns
fn extract_array(value: &Value) -> DataResult<&Vec<Value>> {
    match value {
        Value::Array(arr) => Ok(arr),
        Value::Object(obj) => JSON_WRAPPER_KEYS
            .iter()
            .find_map(|key| match obj.get(*key) {
                Some(Value::Array(arr)) => Some(arr),
                _ => None,
            })
            .ok_or_else(|| {
                DataError::InvalidData(format!(
                    "JSON must be an array or have a {} array",
                    JSON_WRAPPER_KEYS.join("/")
                ))
            }),
        _ => Err(DataError::InvalidData(
            "JSON must be an array of objects".to_string(),
        )),
    }
}

/// Numbers and booleans keep their type; strings stay text so locale
/// formats like `"1,5"` reach the builders untouched.
fn json_value_to_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
        Value::String(s) if s.trim().is_empty() => Cell::Empty,
        Value::String(s) => Cell::Text(s.clone()),
        Value::Array(arr) => Cell::Text(
            arr.iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => Cell::Text(value.to_string()),
    }
}
