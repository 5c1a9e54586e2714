use thiserror::Error;

#[derive(Debug, Error)]
pub enum StandardizeError {
    #[error("kind=missing_field: column `{field}` not found")]
    MissingField { field: String },
    #[error("kind=non_text_value: column `{field}` row {row} is {found}, expected text or null")]
    NonTextValue {
        field: String,
        row: usize,
        found: &'static str,
    },
    #[error("kind=duplicate_column: column `{name}` already exists")]
    DuplicateColumn { name: String },
    #[error("kind=length_mismatch: column `{name}` has {found} rows, table has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("kind=pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl StandardizeError {
    pub fn kind(&self) -> &'static str {
        match self {
            StandardizeError::MissingField { .. } => "missing_field",
            StandardizeError::NonTextValue { .. } => "non_text_value",
            StandardizeError::DuplicateColumn { .. } => "duplicate_column",
            StandardizeError::LengthMismatch { .. } => "length_mismatch",
            StandardizeError::Pattern(_) => "pattern",
        }
    }

    pub(crate) fn missing_field(field: &str) -> Self {
        StandardizeError::MissingField {
            field: field.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardizeError>;
