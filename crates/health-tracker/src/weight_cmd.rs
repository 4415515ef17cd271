use tracker_core::{AppError, WeightEntry};
use tracker_validate::validate_weight_id;

use crate::cli::WeightCommands;
use crate::context::CommandContext;
use crate::entries::{self, AddPlan, Gate};
use crate::result::CommandResult;

pub(crate) fn handle(ctx: &CommandContext, cmd: WeightCommands) -> Result<CommandResult, AppError> {
    match cmd {
        WeightCommands::Add { value, date, notes } => {
            handle_add(ctx, value, date.as_deref(), notes.unwrap_or_default())
        }
        WeightCommands::Get { date } => entries::get::<WeightEntry>(ctx, date.as_deref()),
        WeightCommands::List(range) => entries::list::<WeightEntry>(ctx, &range),
        WeightCommands::Update {
            id,
            value,
            date,
            notes,
        } => handle_update(ctx, &id, value, date.as_deref(), notes),
        WeightCommands::Delete { id } => handle_delete(ctx, &id),
    }
}

/// Add a weight. A confirmed duplicate updates the existing entry in place, keeping its ID.
pub(crate) fn handle_add(
    ctx: &CommandContext,
    value: f64,
    date: Option<&str>,
    notes: String,
) -> Result<CommandResult, AppError> {
    let date = ctx.entry_date(date)?;
    let candidate = WeightEntry::new(date, value, notes);

    match entries::plan_add(ctx, &candidate)? {
        AddPlan::Cancelled(result) => Ok(result),
        AddPlan::Insert { warnings } => {
            let stored = ctx.store.add_weight(candidate)?;
            Ok(entries::added(&stored, warnings))
        }
        AddPlan::Overwrite { existing, warnings } => {
            let stored = ctx.store.update_weight_if_unchanged(&existing, candidate)?;
            Ok(entries::updated(&stored, warnings))
        }
    }
}

pub(crate) fn handle_update(
    ctx: &CommandContext,
    id: &str,
    value: Option<f64>,
    date: Option<&str>,
    notes: Option<String>,
) -> Result<CommandResult, AppError> {
    validate_weight_id(id)?;
    let original = ctx
        .store
        .find_weight_by_id(id)?
        .ok_or_else(|| entries::not_found::<WeightEntry>(id))?;

    let mut candidate = original.clone();
    if let Some(value) = value {
        candidate.weight = value;
    }
    if date.is_some() {
        candidate.date = ctx.entry_date(date)?;
    }
    if let Some(notes) = notes {
        candidate.notes = notes;
    }
    entries::ensure_date_free::<WeightEntry>(ctx, original.date, candidate.date)?;

    match entries::review_update(ctx, &original, &candidate, false)? {
        Gate::Cancelled(result) => Ok(result),
        Gate::Proceed(warnings) => {
            let stored = ctx.store.update_weight_if_unchanged(&original, candidate)?;
            Ok(entries::updated(&stored, warnings))
        }
    }
}

pub(crate) fn handle_delete(ctx: &CommandContext, id: &str) -> Result<CommandResult, AppError> {
    validate_weight_id(id)?;
    let entry = ctx
        .store
        .find_weight_by_id(id)?
        .ok_or_else(|| entries::not_found::<WeightEntry>(id))?;
    if !entries::confirm_delete(ctx, &entry) {
        return Ok(CommandResult::cancelled(entries::CANCELLED));
    }
    let removed = ctx.store.delete_weight_if_unchanged(&entry)?;
    Ok(entries::deleted(&removed))
}

#[cfg(test)]
#[path = "weight_cmd_tests.rs"]
mod tests;
