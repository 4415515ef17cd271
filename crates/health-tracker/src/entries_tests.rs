use super::*;
use crate::confirm::scripted::Scripted;
use crate::confirm::{Confirm, Confirmation};
use crate::result::Status;
use tracker_core::{FastingEntry, MealPattern, StoreError, ValidationError};
use tracker_store::RecordStore;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn context(dir: &std::path::Path, prompt: &Scripted) -> CommandContext {
    let store = RecordStore::open(dir).unwrap();
    CommandContext::for_test(store, date("2024-01-31"), prompt.clone())
}

fn fasting(day: &str, pattern: MealPattern) -> FastingEntry {
    FastingEntry::scheduled(date(day), pattern, "")
}

#[test]
fn test_add_inserts_on_free_date() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = Scripted::answering(&[]);
    let ctx = context(dir.path(), &prompt);

    let result = add(&ctx, fasting("2024-01-08", MealPattern::FullFast)).unwrap();
    assert_eq!(result.status, Status::Completed);
    assert_eq!(result.data["expected_pattern"], "full-fast");
    assert!(prompt.asked().is_empty());
}

#[test]
fn test_plan_add_reports_duplicate_once() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = Scripted::answering(&[true]);
    let ctx = context(dir.path(), &prompt);
    add(&ctx, fasting("2024-01-08", MealPattern::FullFast)).unwrap();

    let plan = plan_add(&ctx, &fasting("2024-01-08", MealPattern::Regular)).unwrap();
    match plan {
        AddPlan::Overwrite { existing, warnings } => {
            assert_eq!(existing.actual_pattern, MealPattern::FullFast);
            assert_eq!(warnings, vec!["entry already exists for 2024-01-08"]);
        }
        other => panic!("expected overwrite, got {other:?}"),
    }

    let asked = prompt.asked();
    assert_eq!(asked.len(), 1);
    assert_eq!(
        asked[0].question,
        "Overwrite the existing fasting entry for 2024-01-08?"
    );
}

#[test]
fn test_add_overwrite_replaces_entry() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = Scripted::answering(&[true]);
    let ctx = context(dir.path(), &prompt);
    add(&ctx, fasting("2024-01-08", MealPattern::FullFast)).unwrap();

    let result = add(&ctx, fasting("2024-01-08", MealPattern::OneMeal)).unwrap();
    assert_eq!(result.message, "Fasting entry for 2024-01-08 updated");

    let all = ctx.store.load_all::<FastingEntry>().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].actual_pattern, MealPattern::OneMeal);
}

#[test]
fn test_notes_over_limit_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = Scripted::answering(&[]);
    let mut ctx = context(dir.path(), &prompt);
    ctx.rules = ctx.rules.clone().with_max_note_length(10);

    let entry = FastingEntry::scheduled(date("2024-01-08"), MealPattern::FullFast, "far too long a note");
    let err = add(&ctx, entry).unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation failed: invalid format: notes must be 10 characters or less (current: 19)"
    );
}

#[test]
fn test_get_missing_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = Scripted::answering(&[]);
    let ctx = context(dir.path(), &prompt);

    let err = get::<FastingEntry>(&ctx, Some("2024-01-08")).unwrap_err();
    assert_eq!(err.to_string(), "fasting entry not found: 2024-01-08");
}

#[test]
fn test_get_rejects_malformed_date() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = Scripted::answering(&[]);
    let ctx = context(dir.path(), &prompt);

    let err = get::<FastingEntry>(&ctx, Some("01/08/2024")).unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InvalidFormat(_))
    ));
}

#[test]
fn test_list_empty_range_completes() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = Scripted::answering(&[]);
    let ctx = context(dir.path(), &prompt);

    let args = RangeArgs {
        from: Some("2024-01-01".into()),
        to: Some("2024-01-07".into()),
        ..Default::default()
    };
    let result = list::<FastingEntry>(&ctx, &args).unwrap();
    assert_eq!(result.status, Status::Completed);
    assert_eq!(
        result.message,
        "No fasting entries found between 2024-01-01 and 2024-01-07"
    );
    assert!(result.details.is_empty());
}

#[test]
fn test_list_sorted_with_summary() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = Scripted::answering(&[true]);
    let ctx = context(dir.path(), &prompt);
    add(&ctx, fasting("2024-01-10", MealPattern::OneMeal)).unwrap();
    // Predates the latest entry, confirmed above.
    add(&ctx, fasting("2024-01-08", MealPattern::Regular)).unwrap();

    let result = list::<FastingEntry>(&ctx, &RangeArgs::default()).unwrap();
    let entries = result.data["entries"].as_array().unwrap();
    assert_eq!(entries[0]["date"], "2024-01-08");
    assert_eq!(entries[1]["date"], "2024-01-10");
    assert_eq!(result.data["summary"]["compliant"], 1);
    assert!(result.details.iter().any(|l| l == "Summary:"));
}

#[test]
fn test_list_conflicting_flags() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = Scripted::answering(&[]);
    let ctx = context(dir.path(), &prompt);

    let args = RangeArgs {
        week: true,
        month: true,
        ..Default::default()
    };
    let err = list::<FastingEntry>(&ctx, &args).unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation failed: cannot use both --week and --month"
    );
}

#[test]
fn test_update_without_warnings_skips_prompt_unless_forced() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = Scripted::answering(&[false]);
    let ctx = context(dir.path(), &prompt);
    add(&ctx, fasting("2024-01-08", MealPattern::Regular)).unwrap();

    let result = update(&ctx, "2024-01-08", false, |e: &FastingEntry| {
        Ok(FastingEntry {
            actual_pattern: MealPattern::FullFast,
            ..e.clone()
        })
    })
    .unwrap();
    assert_eq!(result.status, Status::Completed);
    assert!(prompt.asked().is_empty());

    let forced = update(&ctx, "2024-01-08", true, |e: &FastingEntry| {
        Ok(FastingEntry {
            notes: "skipped".into(),
            ..e.clone()
        })
    })
    .unwrap();
    assert_eq!(forced.status, Status::Cancelled);
    assert_eq!(prompt.asked().len(), 1);

    let stored = ctx
        .store
        .find_by_date::<FastingEntry>(date("2024-01-08"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.actual_pattern, MealPattern::FullFast);
    assert_eq!(stored.notes, "");
}

#[test]
fn test_delete_declined_then_confirmed() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = Scripted::answering(&[false, true]);
    let ctx = context(dir.path(), &prompt);
    add(&ctx, fasting("2024-01-08", MealPattern::FullFast)).unwrap();

    let declined = delete::<FastingEntry>(&ctx, "2024-01-08").unwrap();
    assert_eq!(declined.status, Status::Cancelled);
    assert_eq!(declined.message, CANCELLED);

    let done = delete::<FastingEntry>(&ctx, "2024-01-08").unwrap();
    assert_eq!(done.message, "Fasting entry for 2024-01-08 deleted");
    assert!(ctx.store.load_all::<FastingEntry>().unwrap().is_empty());

    let asked = prompt.asked();
    assert_eq!(asked[0].question, "Delete this fasting entry?");
}

/// Changes the stored entry for 2024-01-08 mid-prompt, then confirms.
struct ConcurrentWriter {
    store: RecordStore,
}

impl Confirm for ConcurrentWriter {
    fn confirm(&self, _confirmation: &Confirmation) -> bool {
        self.store
            .replace_by_date(
                date("2024-01-08"),
                FastingEntry::scheduled(date("2024-01-08"), MealPattern::OneMeal, "other writer"),
            )
            .unwrap();
        true
    }
}

fn racing_context(dir: &std::path::Path) -> CommandContext {
    let store = RecordStore::open(dir).unwrap();
    let writer = ConcurrentWriter {
        store: store.clone(),
    };
    CommandContext::for_test(store, date("2024-01-31"), writer)
}

fn assert_other_writer_kept(ctx: &CommandContext) {
    let all = ctx.store.load_all::<FastingEntry>().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].actual_pattern, MealPattern::OneMeal);
    assert_eq!(all[0].notes, "other writer");
}

#[test]
fn test_overwrite_conflicts_with_change_made_during_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = racing_context(dir.path());
    ctx.store
        .insert(&fasting("2024-01-08", MealPattern::FullFast))
        .unwrap();

    let err = add(&ctx, fasting("2024-01-08", MealPattern::Regular)).unwrap_err();
    assert!(matches!(err, AppError::Store(StoreError::Conflict { .. })));
    assert_other_writer_kept(&ctx);
}

#[test]
fn test_update_conflicts_with_change_made_during_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = racing_context(dir.path());
    ctx.store
        .insert(&fasting("2024-01-08", MealPattern::FullFast))
        .unwrap();

    let err = update(&ctx, "2024-01-08", true, |e: &FastingEntry| {
        Ok(FastingEntry {
            actual_pattern: MealPattern::Regular,
            ..e.clone()
        })
    })
    .unwrap_err();
    assert!(matches!(err, AppError::Store(StoreError::Conflict { .. })));
    assert_other_writer_kept(&ctx);
}

#[test]
fn test_delete_conflicts_with_change_made_during_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = racing_context(dir.path());
    ctx.store
        .insert(&fasting("2024-01-08", MealPattern::FullFast))
        .unwrap();

    let err = delete::<FastingEntry>(&ctx, "2024-01-08").unwrap_err();
    assert!(matches!(err, AppError::Store(StoreError::Conflict { .. })));
    assert_other_writer_kept(&ctx);
}
