use thiserror::Error;

use crate::data::{NumberColumnError, UnknownColumn};

/// Errors raised while turning a dataset into an artifact
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("column {column:?} row {row}: cannot read {value:?} as a number")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
}

impl BuildError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        BuildError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

impl From<UnknownColumn> for BuildError {
    fn from(err: UnknownColumn) -> Self {
        BuildError::MissingColumn(err.0)
    }
}

impl From<NumberColumnError> for BuildError {
    fn from(err: NumberColumnError) -> Self {
        match err {
            NumberColumnError::Unknown(name) => BuildError::MissingColumn(name),
            NumberColumnError::NotNumeric { column, row, value } => {
                BuildError::NotNumeric { column, row, value }
            }
        }
    }
}

pub type BuildResult<T> = Result<T, BuildError>;
