//! CSV and TSV loading through polars.
//!
//! Registry datasets are small, so the lazy frame is collected at once and
//! converted into a [`Dataset`]. Column types come from polars' schema
//! inference; anything it cannot type stays as text for the builders to read.

use crate::constants::{CSV_INFER_SCHEMA_ROWS, MAX_DATA_FILE_SIZE_MB};
use crate::data::dataset::{Cell, Dataset};
use crate::data::error::{DataError, DataResult};
use polars::prelude::*;
use std::path::Path;

/// Field separator of a delimited file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Reject files that are missing, empty or larger than the request limit.
pub(crate) fn check_file_size(path: &Path) -> DataResult<()> {
    let metadata = std::fs::metadata(path)?;
    if metadata.len() == 0 {
        return Err(DataError::EmptyFile);
    }
    let size_mb = metadata.len() / (1024 * 1024);
    if size_mb > MAX_DATA_FILE_SIZE_MB as u64 {
        return Err(DataError::TooLarge {
            size_mb,
            max_mb: MAX_DATA_FILE_SIZE_MB,
        });
    }
    Ok(())
}

/// Load a delimited file with a header row.
pub fn load_delimited(path: &Path, delimiter: Delimiter) -> DataResult<Dataset> {
    check_file_size(path)?;

    let start = std::time::Instant::now();
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(delimiter.byte())
        .with_infer_schema_length(Some(CSV_INFER_SCHEMA_ROWS))
        .finish()?
        .collect()?;

    let dataset = frame_to_dataset(&df, path);
    tracing::debug!(
        path = %path.display(),
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        elapsed = ?start.elapsed(),
        "Loaded delimited file"
    );
    Ok(dataset)
}

fn frame_to_dataset(df: &DataFrame, path: &Path) -> Dataset {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let columns = df.get_columns();
    let rows = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|column| polars_value_to_cell(column, row_idx))
                .collect()
        })
        .collect();

    let mut dataset = Dataset::new(headers, rows);
    dataset.name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Data")
        .to_string();
    dataset.source = Some(path.to_path_buf());
    dataset
}

fn polars_value_to_cell(column: &Column, row_idx: usize) -> Cell {
    match column.get(row_idx) {
        Ok(val) => match val {
            AnyValue::Null => Cell::Empty,
            AnyValue::Int8(v) => Cell::Number(v as f64),
            AnyValue::Int16(v) => Cell::Number(v as f64),
            AnyValue::Int32(v) => Cell::Number(v as f64),
            AnyValue::Int64(v) => Cell::Number(v as f64),
            AnyValue::UInt8(v) => Cell::Number(v as f64),
            AnyValue::UInt16(v) => Cell::Number(v as f64),
            AnyValue::UInt32(v) => Cell::Number(v as f64),
            AnyValue::UInt64(v) => Cell::Number(v as f64),
            AnyValue::Float32(v) => Cell::Number(v as f64),
            AnyValue::Float64(v) => Cell::Number(v),
            AnyValue::Boolean(v) => Cell::Bool(v),
            AnyValue::String(s) => text_cell(s),
            AnyValue::StringOwned(s) => text_cell(s.as_str()),
            other => Cell::Text(format!("{}", other)),
        },
        Err(_) => Cell::Empty,
    }
}

fn text_cell(s: &str) -> Cell {
    if s.trim().is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}
