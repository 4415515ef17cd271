//! Validation engine for candidate entries.
//!
//! One generic pipeline, parameterized by a per-category [`RuleTable`], decides
//! whether a candidate is accepted, rejected with a fatal [`ValidationError`],
//! or accepted with advisory warnings the operator must confirm. Warnings are
//! collected into a single [`ValidationOutcome`] so every concern can be shown
//! in one confirmation prompt.
//!
//! [`ValidationError`]: tracker_core::ValidationError

pub mod dates;
pub mod engine;
pub mod outcome;
pub mod rules;

pub use dates::{DateRange, RangeAnchors, RangeRequest, parse_date, resolve_range};
pub use engine::{
    ValidationMode, ValidationRequest, validate_bounds, validate_date, validate_magnitude_change,
    validate_notes, validate_ratio_change, validate_update_consistency, validate_with_context,
};
pub use outcome::ValidationOutcome;
pub use rules::{Bounds, CategoryRule, ChangeRule, Measure, RuleTable, validate_weight_id};
