use super::*;
use crate::rules::RuleTable;
use proptest::prelude::*;
use tracker_core::{
    ActivityType, Category, ExerciseEntry, FastingEntry, MealPattern, SodaEntry, WeightEntry,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn today() -> NaiveDate {
    date("2024-01-14")
}

fn weight(day: &str, pounds: f64) -> WeightEntry {
    WeightEntry::new(date(day), pounds, "")
}

fn exercise(day: &str, duration: i32) -> ExerciseEntry {
    ExerciseEntry {
        date: date(day),
        activity: ActivityType::Jogging,
        other_activity: None,
        duration,
        notes: String::new(),
        completed: true,
    }
}

fn weight_rule() -> CategoryRule {
    RuleTable::builtin().get(Category::Weight).clone()
}

fn exercise_rule() -> CategoryRule {
    RuleTable::builtin().get(Category::Exercise).clone()
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

#[test]
fn test_validate_bounds_weight_edges() {
    let rule = weight_rule();
    let (measure, bounds) = (rule.measure.unwrap(), rule.bounds.unwrap());

    assert!(validate_bounds(75.0, &measure, &bounds).is_ok());
    assert!(validate_bounds(250.0, &measure, &bounds).is_ok());

    let err = validate_bounds(45.0, &measure, &bounds).unwrap_err();
    assert_eq!(err.to_string(), "weight must be between 75.0 and 250.0 pounds");
    assert!(validate_bounds(250.1, &measure, &bounds).is_err());
}

#[test]
fn test_validate_bounds_exercise_non_positive_is_distinct() {
    let rule = exercise_rule();
    let (measure, bounds) = (rule.measure.unwrap(), rule.bounds.unwrap());

    let err = validate_bounds(0.0, &measure, &bounds).unwrap_err();
    assert!(matches!(err, RangeError::NonPositive { .. }));

    let err = validate_bounds(481.0, &measure, &bounds).unwrap_err();
    assert!(matches!(err, RangeError::OutOfRange { .. }));
}

#[test]
fn test_validate_bounds_rejects_nan() {
    let rule = weight_rule();
    assert!(validate_bounds(f64::NAN, &rule.measure.unwrap(), &rule.bounds.unwrap()).is_err());
}

#[test]
fn test_validate_date_same_day_is_duplicate() {
    let outcome = validate_date(date("2024-01-08"), Some(date("2024-01-08")));
    assert!(outcome.is_valid);
    assert!(outcome.is_duplicate);
    assert_eq!(outcome.warnings, vec!["entry already exists for 2024-01-08"]);
}

#[test]
fn test_validate_date_earlier_predates() {
    let outcome = validate_date(date("2024-01-05"), Some(date("2024-01-08")));
    assert!(!outcome.is_duplicate);
    assert_eq!(
        outcome.warnings,
        vec!["this entry predates the previous entry (2024-01-08)"]
    );
}

#[test]
fn test_validate_date_later_or_first_is_silent() {
    assert!(!validate_date(date("2024-01-09"), Some(date("2024-01-08"))).has_warnings());
    assert!(!validate_date(date("2024-01-09"), None).has_warnings());
}

#[test]
fn test_magnitude_change_threshold_is_strict() {
    let measure = weight_rule().measure.unwrap();

    let outcome = validate_magnitude_change(&measure, 161.0, 150.0, 10.0);
    assert_eq!(
        outcome.warnings,
        vec!["weight change of 11.0 pounds since last entry (150.0) seems unusual"]
    );

    assert!(!validate_magnitude_change(&measure, 160.0, 150.0, 10.0).has_warnings());
    assert!(!validate_magnitude_change(&measure, 159.0, 150.0, 10.0).has_warnings());
    assert!(validate_magnitude_change(&measure, 139.0, 150.0, 10.0).has_warnings());
}

#[test]
fn test_update_consistency_reports_both_neighbours() {
    let measure = weight_rule().measure.unwrap();
    let outcome = validate_update_consistency(&measure, 160.0, Some(140.0), Some(145.0), 10.0);
    assert_eq!(
        outcome.warnings,
        vec![
            "20.0 pounds change from previous entry seems unusual",
            "15.0 pounds change to next entry seems unusual",
        ]
    );
}

#[test]
fn test_update_consistency_without_neighbours() {
    let measure = weight_rule().measure.unwrap();
    assert!(!validate_update_consistency(&measure, 160.0, None, None, 10.0).has_warnings());
}

#[test]
fn test_ratio_change() {
    let measure = exercise_rule().measure.unwrap();

    let grew = validate_ratio_change(&measure, 90.0, 30.0, 2.0);
    assert_eq!(
        grew.warnings,
        vec!["duration change from 30 to 90 minutes seems unusual"]
    );
    assert!(validate_ratio_change(&measure, 10.0, 30.0, 2.0).has_warnings());
    assert!(!validate_ratio_change(&measure, 60.0, 30.0, 2.0).has_warnings());
    assert!(!validate_ratio_change(&measure, 15.0, 30.0, 2.0).has_warnings());
}

#[test]
fn test_validate_notes_counts_characters() {
    assert!(validate_notes(&"a".repeat(500), 500).is_ok());
    assert!(validate_notes(&"é".repeat(500), 500).is_ok());

    let err = validate_notes(&"a".repeat(501), 500).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid format: notes must be 500 characters or less (current: 501)"
    );
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_first_weight_entry_is_clean() {
    let candidate = weight("2024-01-08", 185.5);
    let outcome = validate_with_context(
        &ValidationRequest::new(&candidate),
        &weight_rule(),
        &ValidationMode::add(today()),
    );
    assert!(outcome.is_valid);
    assert!(!outcome.has_warnings());
    assert!(!outcome.is_duplicate);
}

#[test]
fn test_readd_same_date_is_duplicate() {
    let existing = weight("2024-01-08", 185.5);
    let candidate = weight("2024-01-08", 186.0);
    let outcome = validate_with_context(
        &ValidationRequest::new(&candidate).with_last(Some(&existing)),
        &weight_rule(),
        &ValidationMode::add(today()),
    );
    assert!(outcome.is_valid);
    assert!(outcome.is_duplicate);
    assert_eq!(outcome.warnings.len(), 1);
}

#[test]
fn test_out_of_range_has_no_warnings() {
    let existing = weight("2024-01-08", 185.5);
    let candidate = weight("2024-01-08", 45.0);
    let outcome = validate_with_context(
        &ValidationRequest::new(&candidate).with_last(Some(&existing)),
        &weight_rule(),
        &ValidationMode::add(today()),
    );
    assert!(!outcome.is_valid);
    assert!(outcome.warnings.is_empty());
    assert!(!outcome.is_duplicate);
    assert!(matches!(
        outcome.error,
        Some(ValidationError::OutOfRange(RangeError::OutOfRange { .. }))
    ));
}

#[test]
fn test_add_warns_on_large_change_from_latest() {
    let latest = weight("2024-01-08", 150.0);
    let candidate = weight("2024-01-09", 161.0);
    let outcome = validate_with_context(
        &ValidationRequest::new(&candidate).with_last(Some(&latest)),
        &weight_rule(),
        &ValidationMode::add(today()),
    );
    assert!(outcome.is_valid);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("11.0 pounds"));
}

#[test]
fn test_update_uses_two_sided_check_only() {
    let previous = weight("2024-01-07", 140.0);
    let original = weight("2024-01-08", 142.0);
    let next = weight("2024-01-09", 145.0);
    let candidate = weight("2024-01-08", 160.0);

    let outcome = validate_with_context(
        &ValidationRequest::new(&candidate)
            .with_last(Some(&previous))
            .with_next(Some(&next))
            .with_original(Some(&original)),
        &weight_rule(),
        &ValidationMode::update(today()),
    );
    assert!(outcome.is_valid);
    assert_eq!(outcome.warnings.len(), 2);
    assert!(outcome.warnings[0].contains("previous entry"));
    assert!(outcome.warnings[1].contains("next entry"));
}

#[test]
fn test_future_date_is_fatal_but_keeps_warnings() {
    let latest = weight("2024-01-13", 150.0);
    let candidate = weight("2024-01-20", 170.0);
    let outcome = validate_with_context(
        &ValidationRequest::new(&candidate).with_last(Some(&latest)),
        &weight_rule(),
        &ValidationMode::add(today()),
    );
    assert!(!outcome.is_valid);
    assert_eq!(
        outcome.error,
        Some(ValidationError::FutureDate(date("2024-01-20")))
    );
    assert_eq!(outcome.warnings.len(), 1);
}

#[test]
fn test_future_date_allowed_by_mode() {
    let candidate = weight("2024-01-20", 170.0);
    let outcome = validate_with_context(
        &ValidationRequest::new(&candidate),
        &weight_rule(),
        &ValidationMode::add(today()).allow_future(true),
    );
    assert!(outcome.is_valid);
}

#[test]
fn test_exercise_ratio_applies_on_update_only() {
    let original = exercise("2024-01-08", 30);
    let candidate = exercise("2024-01-08", 90);
    let rule = exercise_rule();

    let on_add = validate_with_context(
        &ValidationRequest::new(&candidate).with_original(Some(&original)),
        &rule,
        &ValidationMode::add(today()),
    );
    assert!(!on_add.has_warnings());

    let on_update = validate_with_context(
        &ValidationRequest::new(&candidate).with_original(Some(&original)),
        &rule,
        &ValidationMode::update(today()),
    );
    assert_eq!(on_update.warnings.len(), 1);
}

#[test]
fn test_exercise_other_without_label_is_fatal() {
    let mut candidate = exercise("2024-01-08", 30);
    candidate.activity = ActivityType::Other;
    let outcome = validate_with_context(
        &ValidationRequest::new(&candidate),
        &exercise_rule(),
        &ValidationMode::add(today()),
    );
    assert!(matches!(
        outcome.error,
        Some(ValidationError::MissingField { .. })
    ));
}

#[test]
fn test_soda_rules() {
    let rule = RuleTable::builtin().get(Category::Soda).clone();
    let mode = ValidationMode::add(today());

    let fine = SodaEntry {
        date: date("2024-01-12"),
        consumed: true,
        quantity: 12.0,
        notes: String::new(),
    };
    assert!(validate_with_context(&ValidationRequest::new(&fine), &rule, &mode).is_valid);

    let too_much = SodaEntry {
        quantity: 65.0,
        ..fine.clone()
    };
    assert!(!validate_with_context(&ValidationRequest::new(&too_much), &rule, &mode).is_valid);

    let inconsistent = SodaEntry {
        consumed: true,
        quantity: 0.0,
        ..fine
    };
    assert!(!validate_with_context(&ValidationRequest::new(&inconsistent), &rule, &mode).is_valid);
}

#[test]
fn test_fasting_only_checks_dates_and_notes() {
    let rule = RuleTable::builtin().get(Category::Fasting).clone();
    let existing = FastingEntry::scheduled(date("2024-01-08"), MealPattern::FullFast, "");
    let candidate = FastingEntry::scheduled(date("2024-01-08"), MealPattern::Regular, "");

    let outcome = validate_with_context(
        &ValidationRequest::new(&candidate).with_last(Some(&existing)),
        &rule,
        &ValidationMode::add(today()),
    );
    assert!(outcome.is_valid);
    assert!(outcome.is_duplicate);

    let long_notes = FastingEntry::scheduled(date("2024-01-09"), MealPattern::FullFast, "x".repeat(501));
    let outcome = validate_with_context(
        &ValidationRequest::new(&long_notes),
        &rule,
        &ValidationMode::add(today()),
    );
    assert!(matches!(outcome.error, Some(ValidationError::InvalidFormat(_))));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_weight_accepted_iff_within_bounds(pounds in 0.0f64..400.0) {
        let candidate = weight("2024-01-08", pounds);
        let outcome = validate_with_context(
            &ValidationRequest::new(&candidate),
            &weight_rule(),
            &ValidationMode::add(today()),
        );
        prop_assert_eq!(outcome.is_valid, (75.0..=250.0).contains(&pounds));
    }

    #[test]
    fn prop_duration_accepted_iff_within_bounds(minutes in -100i32..1000) {
        let candidate = exercise("2024-01-08", minutes);
        let outcome = validate_with_context(
            &ValidationRequest::new(&candidate),
            &exercise_rule(),
            &ValidationMode::add(today()),
        );
        prop_assert_eq!(outcome.is_valid, (1..=480).contains(&minutes));
    }

    #[test]
    fn prop_future_dates_always_rejected(days_ahead in 1i64..3650, pounds in 75.0f64..=250.0) {
        let day = today() + chrono::Duration::days(days_ahead);
        let candidate = WeightEntry::new(day, pounds, "");
        let outcome = validate_with_context(
            &ValidationRequest::new(&candidate),
            &weight_rule(),
            &ValidationMode::add(today()),
        );
        prop_assert!(!outcome.is_valid);
        prop_assert_eq!(outcome.error, Some(ValidationError::FutureDate(day)));
    }

    #[test]
    fn prop_rejected_outcome_always_has_error(pounds in 0.0f64..400.0, offset in -30i64..30) {
        let day = today() + chrono::Duration::days(offset);
        let candidate = WeightEntry::new(day, pounds, "");
        let outcome = validate_with_context(
            &ValidationRequest::new(&candidate),
            &weight_rule(),
            &ValidationMode::add(today()),
        );
        prop_assert_eq!(outcome.is_valid, outcome.error.is_none());
    }
}
