use chrono::NaiveDate;
use std::path::PathBuf;

use crate::types::Category;

/// A measurement fell outside its category's accepted bounds.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    /// Value was zero or negative for a field that treats that case separately.
    #[error("{field} must be greater than 0 {unit}")]
    NonPositive { field: &'static str, unit: &'static str },

    #[error(
        "{field} must be between {} and {} {unit}",
        bound(.min, .precision),
        bound(.max, .precision)
    )]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
        unit: &'static str,
        /// Decimal places used when rendering the bounds.
        precision: usize,
    },
}

fn bound(value: &f64, precision: &usize) -> String {
    format!("{value:.precision$}", precision = *precision)
}

/// Fatal reasons a candidate entry is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error(transparent)]
    OutOfRange(#[from] RangeError),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("future dates are not allowed ({0})")]
    FutureDate(NaiveDate),

    #[error("cannot use both --{0} and --{1}")]
    ConflictingFlags(String, String),

    #[error("{field} must be specified when {condition}")]
    MissingField { field: String, condition: String },
}

/// Failures of the JSON record store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("{category} entry not found: {key}")]
    NotFound { category: Category, key: String },

    #[error("{category} entry already exists for {date}")]
    DuplicateDate { category: Category, date: NaiveDate },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to lock {}: {message}", path.display())]
    Lock { path: PathBuf, message: String },

    #[error("corrupt data in {}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    /// The stored entry no longer matches what the caller read before deciding.
    #[error("{category} entry {key} was changed by another writer; nothing was saved")]
    Conflict { category: Category, key: String },

    #[error("no weight entry IDs left after {last}")]
    IdsExhausted { last: String },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors surfaced at the command boundary.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    /// Process exit code for this error.
    ///
    /// User-correctable conditions (validation, not-found, conflicting
    /// writes, config) exit with 1; storage failures exit with 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Store(
                StoreError::NotFound { .. }
                | StoreError::DuplicateDate { .. }
                | StoreError::Conflict { .. },
            ) => 1,
            Self::Store(_) => 2,
            Self::Validation(_) | Self::Config(_) => 1,
        }
    }
}
