use tracker_core::{ActivityType, AppError, ExerciseEntry, ValidationError};

use crate::cli::ExerciseCommands;
use crate::context::CommandContext;
use crate::entries;
use crate::result::CommandResult;

pub(crate) fn handle(
    ctx: &CommandContext,
    cmd: ExerciseCommands,
) -> Result<CommandResult, AppError> {
    match cmd {
        ExerciseCommands::Add {
            activity,
            other_activity,
            duration,
            date,
            notes,
            completed,
        } => {
            let entry = ExerciseEntry {
                date: ctx.entry_date(date.as_deref())?,
                activity,
                other_activity: companion_label(activity, other_activity),
                duration,
                notes: notes.unwrap_or_default(),
                completed,
            };
            entries::add(ctx, entry)
        }
        ExerciseCommands::Get { date } => entries::get::<ExerciseEntry>(ctx, date.as_deref()),
        ExerciseCommands::List(range) => entries::list::<ExerciseEntry>(ctx, &range),
        ExerciseCommands::Update {
            date,
            activity,
            other_activity,
            duration,
            notes,
            completed,
            not_completed,
        } => {
            let completion = completion_flag(completed, not_completed)?;
            // Every exercise edit is summarized and confirmed.
            entries::update(ctx, &date, true, |original: &ExerciseEntry| {
                let mut entry = original.clone();
                if let Some(activity) = activity {
                    entry.activity = activity;
                    entry.other_activity = companion_label(activity, other_activity);
                } else if other_activity.is_some() && entry.activity == ActivityType::Other {
                    entry.other_activity = other_activity;
                }
                if let Some(duration) = duration {
                    entry.duration = duration;
                }
                if let Some(notes) = notes {
                    entry.notes = notes;
                }
                if let Some(completed) = completion {
                    entry.completed = completed;
                }
                Ok(entry)
            })
        }
        ExerciseCommands::Delete { date } => entries::delete::<ExerciseEntry>(ctx, &date),
    }
}

/// Keep the free-text label only for `other`, where it names the activity.
fn companion_label(activity: ActivityType, label: Option<String>) -> Option<String> {
    match activity {
        ActivityType::Other => label.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
        _ => None,
    }
}

fn completion_flag(completed: bool, not_completed: bool) -> Result<Option<bool>, ValidationError> {
    match (completed, not_completed) {
        (true, true) => Err(ValidationError::ConflictingFlags(
            "completed".to_string(),
            "not-completed".to_string(),
        )),
        (true, false) => Ok(Some(true)),
        (false, true) => Ok(Some(false)),
        (false, false) => Ok(None),
    }
}

#[cfg(test)]
#[path = "exercise_cmd_tests.rs"]
mod tests;
