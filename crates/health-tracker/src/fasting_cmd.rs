use tracker_core::{AppError, FastingEntry};

use crate::cli::FastingCommands;
use crate::context::CommandContext;
use crate::entries;
use crate::result::CommandResult;

pub(crate) fn handle(ctx: &CommandContext, cmd: FastingCommands) -> Result<CommandResult, AppError> {
    match cmd {
        FastingCommands::Add {
            pattern,
            expected,
            date,
            notes,
        } => {
            let date = ctx.entry_date(date.as_deref())?;
            let mut entry = FastingEntry::scheduled(date, pattern, notes.unwrap_or_default());
            if let Some(expected) = expected {
                entry.expected_pattern = expected;
            }
            entries::add(ctx, entry)
        }
        FastingCommands::Get { date } => entries::get::<FastingEntry>(ctx, date.as_deref()),
        FastingCommands::List(range) => entries::list::<FastingEntry>(ctx, &range),
        FastingCommands::Update {
            date,
            pattern,
            expected,
            notes,
        } => entries::update(ctx, &date, false, |original: &FastingEntry| {
            let mut entry = original.clone();
            if let Some(pattern) = pattern {
                entry.actual_pattern = pattern;
            }
            if let Some(expected) = expected {
                entry.expected_pattern = expected;
            }
            if let Some(notes) = notes {
                entry.notes = notes;
            }
            Ok(entry)
        }),
        FastingCommands::Delete { date } => entries::delete::<FastingEntry>(ctx, &date),
    }
}
