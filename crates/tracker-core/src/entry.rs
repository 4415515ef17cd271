use chrono::{Datelike, NaiveDate, Weekday};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{ActivityType, Category, MealPattern};

/// Daily exercise goal in minutes.
pub const EXERCISE_GOAL_MINUTES: i32 = 45;
/// Largest weekend soda allowance in ounces that still counts as compliant.
pub const WEEKEND_SODA_ALLOWANCE_OZ: f64 = 12.0;

/// A dated entry persisted in one category's JSON array file.
///
/// At most one entry exists per calendar date in a category.
pub trait Record: Clone + PartialEq + std::fmt::Debug + Serialize + DeserializeOwned {
    const CATEGORY: Category;

    fn date(&self) -> NaiveDate;

    fn notes(&self) -> &str;

    /// Numeric value checked against the category bounds and change rules.
    fn measurement(&self) -> Option<f64>;

    /// Whether the entry meets the tracking goal for its day.
    fn is_compliant(&self) -> bool;

    /// Field checks other than numeric bounds (companion labels, flag consistency).
    fn check_fields(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Carry over store-assigned identity from the entry being replaced.
    fn inherit_identity(&mut self, _stored: &Self) {}
}

// ---------------------------------------------------------------------------
// Weight
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// Stable identifier (`w00001`). Empty until the store assigns one.
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    /// Pounds.
    pub weight: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl WeightEntry {
    pub fn new(date: NaiveDate, weight: f64, notes: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            date,
            weight,
            notes: notes.into(),
        }
    }
}

impl Record for WeightEntry {
    const CATEGORY: Category = Category::Weight;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn notes(&self) -> &str {
        &self.notes
    }

    fn measurement(&self) -> Option<f64> {
        Some(self.weight)
    }

    // Measurements are always compliant.
    fn is_compliant(&self) -> bool {
        true
    }

    fn inherit_identity(&mut self, stored: &Self) {
        self.id.clone_from(&stored.id);
    }
}

// ---------------------------------------------------------------------------
// Exercise
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub date: NaiveDate,
    pub activity: ActivityType,
    /// Name of the activity when `activity` is `other`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_activity: Option<String>,
    /// Minutes.
    pub duration: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default)]
    pub completed: bool,
}

impl ExerciseEntry {
    /// Human-readable activity name, using the companion label for `other`.
    pub fn activity_label(&self) -> String {
        match (&self.activity, &self.other_activity) {
            (ActivityType::Other, Some(label)) => format!("other ({label})"),
            (activity, _) => activity.to_string(),
        }
    }
}

impl Record for ExerciseEntry {
    const CATEGORY: Category = Category::Exercise;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn notes(&self) -> &str {
        &self.notes
    }

    fn measurement(&self) -> Option<f64> {
        Some(f64::from(self.duration))
    }

    fn is_compliant(&self) -> bool {
        self.completed && self.duration >= EXERCISE_GOAL_MINUTES
    }

    fn check_fields(&self) -> Result<(), ValidationError> {
        let has_label = self
            .other_activity
            .as_deref()
            .is_some_and(|label| !label.trim().is_empty());
        if self.activity == ActivityType::Other && !has_label {
            return Err(ValidationError::MissingField {
                field: "other_activity".to_string(),
                condition: "activity type is 'other'".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fasting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastingEntry {
    pub date: NaiveDate,
    pub expected_pattern: MealPattern,
    pub actual_pattern: MealPattern,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl FastingEntry {
    /// Build an entry whose expected pattern follows the weekly schedule.
    pub fn scheduled(date: NaiveDate, actual_pattern: MealPattern, notes: impl Into<String>) -> Self {
        Self {
            date,
            expected_pattern: MealPattern::scheduled_for(date.weekday()),
            actual_pattern,
            notes: notes.into(),
        }
    }
}

impl Record for FastingEntry {
    const CATEGORY: Category = Category::Fasting;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn notes(&self) -> &str {
        &self.notes
    }

    fn measurement(&self) -> Option<f64> {
        None
    }

    fn is_compliant(&self) -> bool {
        self.actual_pattern == MealPattern::scheduled_for(self.date.weekday())
    }
}

// ---------------------------------------------------------------------------
// Soda
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SodaEntry {
    pub date: NaiveDate,
    pub consumed: bool,
    /// Ounces. Zero when nothing was consumed.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

impl Record for SodaEntry {
    const CATEGORY: Category = Category::Soda;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn notes(&self) -> &str {
        &self.notes
    }

    fn measurement(&self) -> Option<f64> {
        Some(self.quantity)
    }

    fn is_compliant(&self) -> bool {
        match self.date.weekday() {
            Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => !self.consumed,
            Weekday::Fri | Weekday::Sat | Weekday::Sun => {
                !self.consumed || self.quantity <= WEEKEND_SODA_ALLOWANCE_OZ
            }
        }
    }

    fn check_fields(&self) -> Result<(), ValidationError> {
        if self.consumed && self.quantity <= 0.0 {
            return Err(ValidationError::MissingField {
                field: "quantity".to_string(),
                condition: "soda was consumed".to_string(),
            });
        }
        if !self.consumed && self.quantity > 0.0 {
            return Err(ValidationError::InvalidFormat(
                "quantity must be 0 when no soda was consumed".to_string(),
            ));
        }
        Ok(())
    }
}
