//! Command flows shared by every category.
//!
//! Validation decides, the operator confirms, then the store is written.
//! Nothing is persisted before the confirmation gate has been passed, and the
//! write only lands if the stored entry still matches what the operator saw.

use chrono::NaiveDate;
use tracker_core::{AppError, Record, StoreError};
use tracker_validate::{ValidationRequest, validate_with_context};

use crate::cli::RangeArgs;
use crate::confirm::Confirmation;
use crate::context::CommandContext;
use crate::display::{EntryView, table};
use crate::result::CommandResult;
use crate::stats::{Summarize, Summary};

pub(crate) const CANCELLED: &str = "Operation cancelled";

/// How an accepted add should be written.
#[derive(Debug)]
pub(crate) enum AddPlan<T> {
    /// No entry exists for the date.
    Insert { warnings: Vec<String> },
    /// An entry exists for the date and the operator agreed to replace it.
    Overwrite { existing: T, warnings: Vec<String> },
    Cancelled(CommandResult),
}

/// Result of the confirmation gate for an edit.
#[derive(Debug)]
pub(crate) enum Gate {
    Proceed(Vec<String>),
    Cancelled(CommandResult),
}

/// Validate a new entry and resolve a same-date collision with the operator.
///
/// A duplicate date is never written as a second entry: it becomes an
/// overwrite once confirmed, or the add is abandoned.
pub(crate) fn plan_add<T: EntryView>(
    ctx: &CommandContext,
    candidate: &T,
) -> Result<AddPlan<T>, AppError> {
    let existing = ctx.store.find_by_date::<T>(candidate.date())?;
    let latest = match existing {
        Some(_) => None,
        None => ctx.store.latest::<T>()?,
    };
    let last = existing.as_ref().or(latest.as_ref());

    let outcome = validate_with_context(
        &ValidationRequest::new(candidate).with_last(last),
        ctx.rule::<T>(),
        &ctx.add_mode(),
    );
    let warnings = outcome.into_result()?;

    match existing {
        Some(existing) => {
            tracing::info!(category = %T::CATEGORY, date = %candidate.date(), "duplicate date detected");
            let confirmation = Confirmation::new(format!(
                "Overwrite the existing {} entry for {}?",
                T::CATEGORY,
                candidate.date()
            ))
            .with_warnings(&warnings)
            .with_details(before_after(&existing, candidate));
            if !ctx.confirm(&confirmation) {
                return Ok(AddPlan::Cancelled(
                    CommandResult::cancelled(CANCELLED).with_warnings(warnings),
                ));
            }
            Ok(AddPlan::Overwrite { existing, warnings })
        }
        None => {
            if !warnings.is_empty() {
                let confirmation = Confirmation::new("Add this entry anyway?")
                    .with_warnings(&warnings)
                    .with_details(candidate.detail_lines());
                if !ctx.confirm(&confirmation) {
                    return Ok(AddPlan::Cancelled(
                        CommandResult::cancelled(CANCELLED).with_warnings(warnings),
                    ));
                }
            }
            Ok(AddPlan::Insert { warnings })
        }
    }
}

/// Validate an edit against its chronological neighbours and gate it on confirmation.
///
/// `always_confirm` asks even when there are no warnings.
pub(crate) fn review_update<T: EntryView>(
    ctx: &CommandContext,
    original: &T,
    candidate: &T,
    always_confirm: bool,
) -> Result<Gate, AppError> {
    let (previous, next) = ctx
        .store
        .neighbors::<T>(candidate.date(), Some(original.date()))?;

    let outcome = validate_with_context(
        &ValidationRequest::new(candidate)
            .with_last(previous.as_ref())
            .with_next(next.as_ref())
            .with_original(Some(original)),
        ctx.rule::<T>(),
        &ctx.update_mode(),
    );
    let warnings = outcome.into_result()?;

    if always_confirm || !warnings.is_empty() {
        let confirmation = Confirmation::new("Save these changes?")
            .with_warnings(&warnings)
            .with_details(before_after(original, candidate));
        if !ctx.confirm(&confirmation) {
            return Ok(Gate::Cancelled(
                CommandResult::cancelled(CANCELLED).with_warnings(warnings),
            ));
        }
    }
    Ok(Gate::Proceed(warnings))
}

/// Fail when moving an entry to `new_date` would collide with another entry.
pub(crate) fn ensure_date_free<T: Record>(
    ctx: &CommandContext,
    original_date: NaiveDate,
    new_date: NaiveDate,
) -> Result<(), AppError> {
    if new_date != original_date && ctx.store.find_by_date::<T>(new_date)?.is_some() {
        return Err(StoreError::DuplicateDate {
            category: T::CATEGORY,
            date: new_date,
        }
        .into());
    }
    Ok(())
}

pub(crate) fn confirm_delete<T: EntryView>(ctx: &CommandContext, entry: &T) -> bool {
    let confirmation = Confirmation::new(format!("Delete this {} entry?", T::CATEGORY))
        .with_details(entry.detail_lines());
    ctx.confirm(&confirmation)
}

pub(crate) fn not_found<T: Record>(key: impl Into<String>) -> AppError {
    StoreError::NotFound {
        category: T::CATEGORY,
        key: key.into(),
    }
    .into()
}

fn before_after<T: EntryView>(current: &T, updated: &T) -> Vec<String> {
    let mut lines = vec!["Current:".to_string()];
    lines.extend(current.detail_lines());
    lines.push("New:".to_string());
    lines.extend(updated.detail_lines());
    lines
}

fn saved<T: EntryView>(message: String, entry: &T, warnings: Vec<String>) -> CommandResult {
    CommandResult::completed(message)
        .with_warnings(warnings)
        .with_data(entry)
        .with_details(entry.detail_lines())
}

pub(crate) fn added<T: EntryView>(entry: &T, warnings: Vec<String>) -> CommandResult {
    saved(
        format!("{} entry added for {}", T::NOUN, entry.date()),
        entry,
        warnings,
    )
}

pub(crate) fn updated<T: EntryView>(entry: &T, warnings: Vec<String>) -> CommandResult {
    saved(
        format!("{} entry for {} updated", T::NOUN, entry.date()),
        entry,
        warnings,
    )
}

pub(crate) fn deleted<T: EntryView>(entry: &T) -> CommandResult {
    CommandResult::completed(format!("{} entry for {} deleted", T::NOUN, entry.date()))
        .with_data(entry)
}

// -- Date-keyed handlers -----------------------------------------------------

pub(crate) fn add<T: EntryView>(ctx: &CommandContext, candidate: T) -> Result<CommandResult, AppError> {
    match plan_add(ctx, &candidate)? {
        AddPlan::Cancelled(result) => Ok(result),
        AddPlan::Insert { warnings } => {
            ctx.store.insert(&candidate)?;
            Ok(added(&candidate, warnings))
        }
        AddPlan::Overwrite { existing, warnings } => {
            let stored = ctx.store.replace_if_unchanged(&existing, candidate)?;
            Ok(updated(&stored, warnings))
        }
    }
}

pub(crate) fn get<T: EntryView>(
    ctx: &CommandContext,
    date: Option<&str>,
) -> Result<CommandResult, AppError> {
    let date = ctx.lookup_date(date)?;
    let entry = ctx
        .store
        .find_by_date::<T>(date)?
        .ok_or_else(|| not_found::<T>(date.to_string()))?;
    Ok(CommandResult::completed(format!("{} entry for {date}", T::NOUN))
        .with_data(&entry)
        .with_details(entry.detail_lines()))
}

pub(crate) fn list<T: EntryView + Summarize>(
    ctx: &CommandContext,
    args: &RangeArgs,
) -> Result<CommandResult, AppError> {
    let range = ctx.range(args)?;
    let entries = ctx.store.range::<T>(range.from, range.to)?;
    if entries.is_empty() {
        return Ok(CommandResult::completed(format!(
            "No {} entries found between {} and {}",
            T::CATEGORY,
            range.from,
            range.to
        ))
        .with_data(&serde_json::json!({
            "from": range.from,
            "to": range.to,
            "entries": [],
        })));
    }

    let summary = T::summarize(&entries);
    let mut details = table(&entries);
    details.push(String::new());
    details.push("Summary:".to_string());
    details.extend(summary.lines());

    Ok(
        CommandResult::completed(format!("{} entries from {range}", T::NOUN))
            .with_data(&serde_json::json!({
                "from": range.from,
                "to": range.to,
                "entries": entries,
                "summary": summary,
            }))
            .with_details(details),
    )
}

/// Edit the entry recorded on `date`. `edit` builds the candidate from the stored entry.
pub(crate) fn update<T: EntryView>(
    ctx: &CommandContext,
    date: &str,
    always_confirm: bool,
    edit: impl FnOnce(&T) -> Result<T, AppError>,
) -> Result<CommandResult, AppError> {
    let date = ctx.lookup_date(Some(date))?;
    let original = ctx
        .store
        .find_by_date::<T>(date)?
        .ok_or_else(|| not_found::<T>(date.to_string()))?;
    let candidate = edit(&original)?;
    ensure_date_free::<T>(ctx, original.date(), candidate.date())?;

    match review_update(ctx, &original, &candidate, always_confirm)? {
        Gate::Cancelled(result) => Ok(result),
        Gate::Proceed(warnings) => {
            let stored = ctx.store.replace_if_unchanged(&original, candidate)?;
            Ok(updated(&stored, warnings))
        }
    }
}

pub(crate) fn delete<T: EntryView>(ctx: &CommandContext, date: &str) -> Result<CommandResult, AppError> {
    let date = ctx.lookup_date(Some(date))?;
    let entry = ctx
        .store
        .find_by_date::<T>(date)?
        .ok_or_else(|| not_found::<T>(date.to_string()))?;
    if !confirm_delete(ctx, &entry) {
        return Ok(CommandResult::cancelled(CANCELLED));
    }
    let removed = ctx.store.delete_if_unchanged(&entry)?;
    Ok(deleted(&removed))
}

#[cfg(test)]
#[path = "entries_tests.rs"]
mod tests;
