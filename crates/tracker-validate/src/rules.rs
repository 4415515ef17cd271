use regex::Regex;
use std::sync::OnceLock;
use tracker_core::{Category, ValidationError};

/// Default maximum note length, in characters.
pub const MAX_NOTE_LENGTH: usize = 500;

const WEIGHT_ID_PATTERN: &str = r"^w[0-9]{5}$";

/// Name and unit of a category's measured field, used in messages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measure {
    pub field: &'static str,
    pub unit: &'static str,
    /// Decimal places when rendering values of this field.
    pub precision: usize,
}

/// Inclusive bounds for a measured field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    /// Report `value <= 0` as its own error instead of a generic out-of-range.
    pub non_positive_distinct: bool,
}

/// How a new value is compared against neighbouring entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangeRule {
    None,
    /// Warn when `|new - reference|` exceeds the threshold.
    Absolute { max_delta: f64 },
    /// On update only, warn when the value grows or shrinks by more than `factor`.
    Ratio { factor: f64 },
}

/// Validation rules for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRule {
    pub category: Category,
    pub measure: Option<Measure>,
    pub bounds: Option<Bounds>,
    pub change: ChangeRule,
    pub max_note_length: usize,
}

/// Per-category rules, keyed by [`Category`].
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    pub weight: CategoryRule,
    pub exercise: CategoryRule,
    pub fasting: CategoryRule,
    pub soda: CategoryRule,
}

impl RuleTable {
    /// Built-in rules: weight 75-250 lbs with a 10 lb change threshold,
    /// exercise 1-480 minutes, soda 0-64 oz, fasting unmeasured.
    pub fn builtin() -> Self {
        Self {
            weight: CategoryRule {
                category: Category::Weight,
                measure: Some(Measure {
                    field: "weight",
                    unit: "pounds",
                    precision: 1,
                }),
                bounds: Some(Bounds {
                    min: 75.0,
                    max: 250.0,
                    non_positive_distinct: false,
                }),
                change: ChangeRule::Absolute { max_delta: 10.0 },
                max_note_length: MAX_NOTE_LENGTH,
            },
            exercise: CategoryRule {
                category: Category::Exercise,
                measure: Some(Measure {
                    field: "duration",
                    unit: "minutes",
                    precision: 0,
                }),
                bounds: Some(Bounds {
                    min: 1.0,
                    max: 480.0,
                    non_positive_distinct: true,
                }),
                change: ChangeRule::Ratio { factor: 2.0 },
                max_note_length: MAX_NOTE_LENGTH,
            },
            fasting: CategoryRule {
                category: Category::Fasting,
                measure: None,
                bounds: None,
                change: ChangeRule::None,
                max_note_length: MAX_NOTE_LENGTH,
            },
            soda: CategoryRule {
                category: Category::Soda,
                measure: Some(Measure {
                    field: "quantity",
                    unit: "oz",
                    precision: 0,
                }),
                bounds: Some(Bounds {
                    min: 0.0,
                    max: 64.0,
                    non_positive_distinct: false,
                }),
                change: ChangeRule::None,
                max_note_length: MAX_NOTE_LENGTH,
            },
        }
    }

    pub fn get(&self, category: Category) -> &CategoryRule {
        match category {
            Category::Weight => &self.weight,
            Category::Exercise => &self.exercise,
            Category::Fasting => &self.fasting,
            Category::Soda => &self.soda,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut CategoryRule {
        match category {
            Category::Weight => &mut self.weight,
            Category::Exercise => &mut self.exercise,
            Category::Fasting => &mut self.fasting,
            Category::Soda => &mut self.soda,
        }
    }

    /// Apply one note-length limit to every category.
    pub fn with_max_note_length(mut self, max_note_length: usize) -> Self {
        for category in Category::ALL {
            self.get_mut(category).max_note_length = max_note_length;
        }
        self
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn weight_id_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(WEIGHT_ID_PATTERN).ok())
        .as_ref()
}

/// Check a weight identifier is `w` followed by five digits.
pub fn validate_weight_id(id: &str) -> Result<(), ValidationError> {
    if !weight_id_regex().is_some_and(|re| re.is_match(id)) {
        return Err(ValidationError::InvalidFormat(format!(
            "invalid weight entry ID '{id}': must be 'w' followed by 5 digits"
        )));
    }
    Ok(())
}
