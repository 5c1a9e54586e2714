//! Text standardization for tabular text columns.
//!
//! Cleans a named column ahead of text analysis:
//! - URL removal (`http` plus its attached non-whitespace run)
//! - Bare `http` removal
//! - `@mention` removal, with any lone `@` rewritten to `at`
//! - Unicode lowercasing

pub mod error;
pub mod report;
pub mod standardizer;
pub mod table;

// Re-export main types at crate root for convenience
pub use error::{Result, StandardizeError};
pub use report::{ColumnReport, TextReport};
pub use standardizer::{
    standardize, standardize_in_place, standardize_text, standardize_text_with_report,
    StandardizeOptions, TextStandardizer,
};
pub use table::{Column, Table, Value};
