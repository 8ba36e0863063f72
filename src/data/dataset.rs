//! In-memory tabular dataset handed to chart builders.
//!
//! A dataset lives for a single request. Builders only ever borrow it, so any
//! cleanup they perform produces new vectors instead of rewriting cells.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::data::numeric::{NumberStyle, parse_number};

/// A single cell value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl Cell {
    /// Display form of the cell, empty string for missing values
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Cell::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Cell::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// JSON value used when the cell is placed on a chart axis.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Empty => Value::Null,
        }
    }
}

/// Rows of cells under ordered header names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Human-readable name (file stem)
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// File the rows were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Column lookups fail with the name that was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumn(pub String);

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: "Data".to_string(),
            headers,
            rows,
            source: None,
        }
    }

    /// Build a dataset from string literals, mostly for fixtures.
    ///
    /// Values that parse as plain numbers become `Cell::Number`, blanks become
    /// `Cell::Empty` and everything else stays text.
    pub fn from_strings(headers: &[&str], rows: &[Vec<&str>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|v| {
                        let trimmed = v.trim();
                        if trimmed.is_empty() {
                            Cell::Empty
                        } else if let Ok(n) = trimmed.parse::<f64>() {
                            Cell::Number(n)
                        } else {
                            Cell::Text((*v).to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        Self::new(headers.iter().map(|h| h.to_string()).collect(), rows)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, UnknownColumn> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| UnknownColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Cell at (row, column index); short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// All cells of a named column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Cell>, UnknownColumn> {
        let idx = self.column_index(name)?;
        Ok((0..self.rows.len()).map(|r| self.cell(r, idx)).collect())
    }

    /// Display text of a named column, empty strings for missing values.
    pub fn texts(&self, name: &str) -> Result<Vec<String>, UnknownColumn> {
        Ok(self.column(name)?.into_iter().map(Cell::to_text).collect())
    }

    /// Numeric view of a named column.
    ///
    /// Empty cells map to `None`. The error carries the row and raw value of
    /// the first cell that could not be read under `style`.
    pub fn numbers(
        &self,
        name: &str,
        style: NumberStyle,
    ) -> Result<Vec<Option<f64>>, NumberColumnError> {
        let cells = self
            .column(name)
            .map_err(|e| NumberColumnError::Unknown(e.0))?;
        cells
            .into_iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                Cell::Number(n) => Ok(Some(*n)),
                Cell::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
                Cell::Empty => Ok(None),
                Cell::Text(s) if s.trim().is_empty() => Ok(None),
                Cell::Text(s) => parse_number(s, style).map(Some).ok_or_else(|| {
                    NumberColumnError::NotNumeric {
                        column: name.to_string(),
                        row,
                        value: s.clone(),
                    }
                }),
            })
            .collect()
    }
}

/// Failure reading a column as numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberColumnError {
    Unknown(String),
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },
}
