//! Domain types shared by every health-tracker crate.
//!
//! Entries, categories, and the typed error taxonomy live here so the
//! validation engine, the record store, and the CLI agree on one vocabulary.

pub mod entry;
pub mod error;
pub mod types;

pub use entry::{ExerciseEntry, FastingEntry, Record, SodaEntry, WeightEntry};
pub use error::{AppError, RangeError, StoreError, ValidationError};
pub use types::{ActivityType, Category, DATE_FORMAT, MealPattern, OutputFormat};
