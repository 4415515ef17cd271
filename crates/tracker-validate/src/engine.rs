use chrono::NaiveDate;
use tracing::debug;
use tracker_core::{RangeError, Record, ValidationError};

use crate::outcome::ValidationOutcome;
use crate::rules::{Bounds, CategoryRule, ChangeRule, Measure};

/// Per-invocation flags that change how a candidate is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationMode {
    pub is_update: bool,
    pub allow_future_dates: bool,
    /// The current calendar day; candidates after it are future-dated.
    pub today: NaiveDate,
}

impl ValidationMode {
    pub fn add(today: NaiveDate) -> Self {
        Self {
            is_update: false,
            allow_future_dates: false,
            today,
        }
    }

    pub fn update(today: NaiveDate) -> Self {
        Self {
            is_update: true,
            ..Self::add(today)
        }
    }

    pub fn allow_future(mut self, allow: bool) -> Self {
        self.allow_future_dates = allow;
        self
    }
}

/// A candidate entry plus its chronological context.
#[derive(Debug)]
pub struct ValidationRequest<'a, T> {
    pub candidate: &'a T,
    /// On add: the entry already on the candidate's date, otherwise the most
    /// recent entry. On update: the entry immediately before the candidate.
    pub last: Option<&'a T>,
    /// On update: the entry immediately after the candidate.
    pub next: Option<&'a T>,
    /// On update: the entry as currently stored.
    pub original: Option<&'a T>,
}

impl<'a, T> ValidationRequest<'a, T> {
    pub fn new(candidate: &'a T) -> Self {
        Self {
            candidate,
            last: None,
            next: None,
            original: None,
        }
    }

    pub fn with_last(mut self, last: Option<&'a T>) -> Self {
        self.last = last;
        self
    }

    pub fn with_next(mut self, next: Option<&'a T>) -> Self {
        self.next = next;
        self
    }

    pub fn with_original(mut self, original: Option<&'a T>) -> Self {
        self.original = original;
        self
    }
}

/// Check `value` lies within `bounds` (inclusive).
pub fn validate_bounds(value: f64, measure: &Measure, bounds: &Bounds) -> Result<(), RangeError> {
    if bounds.non_positive_distinct && value <= 0.0 {
        return Err(RangeError::NonPositive {
            field: measure.field,
            unit: measure.unit,
        });
    }
    if !(bounds.min..=bounds.max).contains(&value) {
        return Err(RangeError::OutOfRange {
            field: measure.field,
            value,
            min: bounds.min,
            max: bounds.max,
            unit: measure.unit,
            precision: measure.precision,
        });
    }
    Ok(())
}

/// Compare the candidate date against the most recent known entry date.
///
/// Same date marks a duplicate; an earlier date warns that the entry predates
/// the previous one. Neither is fatal.
pub fn validate_date(candidate: NaiveDate, most_recent: Option<NaiveDate>) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::valid();
    let Some(most_recent) = most_recent else {
        return outcome;
    };

    if candidate == most_recent {
        outcome.is_duplicate = true;
        outcome.warn(format!("entry already exists for {candidate}"));
    } else if candidate < most_recent {
        outcome.warn(format!(
            "this entry predates the previous entry ({most_recent})"
        ));
    }
    outcome
}

/// Warn when `new_value` differs from `reference` by more than `max_delta`.
pub fn validate_magnitude_change(
    measure: &Measure,
    new_value: f64,
    reference: f64,
    max_delta: f64,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::valid();
    let change = (new_value - reference).abs();
    if change > max_delta {
        outcome.warn(format!(
            "{} change of {:.1} {} since last entry ({:.*}) seems unusual",
            measure.field, change, measure.unit, measure.precision, reference
        ));
    }
    outcome
}

/// Check an edited value against both chronological neighbours independently.
pub fn validate_update_consistency(
    measure: &Measure,
    new_value: f64,
    previous: Option<f64>,
    next: Option<f64>,
    max_delta: f64,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::valid();

    if let Some(previous) = previous {
        let change = (new_value - previous).abs();
        if change > max_delta {
            outcome.warn(format!(
                "{:.1} {} change from previous entry seems unusual",
                change, measure.unit
            ));
        }
    }

    if let Some(next) = next {
        let change = (next - new_value).abs();
        if change > max_delta {
            outcome.warn(format!(
                "{:.1} {} change to next entry seems unusual",
                change, measure.unit
            ));
        }
    }

    outcome
}

/// Warn when an edit scales the stored value up or down by more than `factor`.
pub fn validate_ratio_change(
    measure: &Measure,
    new_value: f64,
    original: f64,
    factor: f64,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::valid();
    if new_value > original * factor || new_value < original / factor {
        outcome.warn(format!(
            "{} change from {:.*} to {:.*} {} seems unusual",
            measure.field, measure.precision, original, measure.precision, new_value, measure.unit
        ));
    }
    outcome
}

/// Reject notes longer than `max_len` characters.
pub fn validate_notes(notes: &str, max_len: usize) -> Result<(), ValidationError> {
    let len = notes.chars().count();
    if len > max_len {
        return Err(ValidationError::InvalidFormat(format!(
            "notes must be {max_len} characters or less (current: {len})"
        )));
    }
    Ok(())
}

/// Run the full pipeline for one candidate.
///
/// Order: bounds (fatal), field checks (fatal), date/duplicate, change rule
/// (one-sided on add, two-sided on update), then the future-date gate
/// (fatal unless `mode.allow_future_dates`). The first fatal condition stops
/// evaluation.
pub fn validate_with_context<T: Record>(
    request: &ValidationRequest<'_, T>,
    rule: &CategoryRule,
    mode: &ValidationMode,
) -> ValidationOutcome {
    let candidate = request.candidate;
    let value = candidate.measurement();

    if let (Some(measure), Some(bounds), Some(value)) = (&rule.measure, &rule.bounds, value) {
        if let Err(err) = validate_bounds(value, measure, bounds) {
            debug!(category = %rule.category, %err, "candidate rejected by bounds check");
            return ValidationOutcome::rejected(err);
        }
    }

    if let Err(err) = candidate.check_fields() {
        return ValidationOutcome::rejected(err);
    }
    if let Err(err) = validate_notes(candidate.notes(), rule.max_note_length) {
        return ValidationOutcome::rejected(err);
    }

    let mut outcome = ValidationOutcome::valid();
    outcome.merge(validate_date(
        candidate.date(),
        request.last.map(Record::date),
    ));

    if let (Some(measure), Some(value)) = (&rule.measure, value) {
        match rule.change {
            ChangeRule::Absolute { max_delta } if mode.is_update => {
                outcome.merge(validate_update_consistency(
                    measure,
                    value,
                    request.last.and_then(Record::measurement),
                    request.next.and_then(Record::measurement),
                    max_delta,
                ));
            }
            ChangeRule::Absolute { max_delta } => {
                if let Some(reference) = request.last.and_then(Record::measurement) {
                    outcome.merge(validate_magnitude_change(
                        measure, value, reference, max_delta,
                    ));
                }
            }
            ChangeRule::Ratio { factor } if mode.is_update => {
                if let Some(original) = request.original.and_then(Record::measurement) {
                    outcome.merge(validate_ratio_change(measure, value, original, factor));
                }
            }
            ChangeRule::Ratio { .. } | ChangeRule::None => {}
        }
    }

    if !mode.allow_future_dates && candidate.date() > mode.today {
        outcome.reject(ValidationError::FutureDate(candidate.date()));
        return outcome;
    }

    debug!(
        category = %rule.category,
        warnings = outcome.warnings.len(),
        duplicate = outcome.is_duplicate,
        "candidate validated"
    );
    outcome
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
