//! Dataset model and loaders
//!
//! Registry entries name a data file and a parser. The loaders here turn
//! that file into a [`Dataset`], a plain table of [`Cell`]s that chart
//! builders read but never modify.
//!
//! ## Error Handling
//!
//! All loaders return `DataResult<T>` which uses the `DataError` type.
//! Common errors include:
//! - `TooLarge`: File exceeds the per-request size limit
//! - `EmptyFile`: Nothing to parse
//! - `Io`: File system errors
//! - `Polars`/`Json`: Parse errors

mod dataset;
mod error;
mod frame_loader;
mod json_parser;
pub mod numeric;

pub use dataset::*;
pub use error::*;
pub use frame_loader::*;
pub use json_parser::*;
