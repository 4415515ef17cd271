use tracker_core::{AppError, SodaEntry, ValidationError};

use crate::cli::SodaCommands;
use crate::context::CommandContext;
use crate::entries;
use crate::result::CommandResult;

pub(crate) fn handle(ctx: &CommandContext, cmd: SodaCommands) -> Result<CommandResult, AppError> {
    match cmd {
        SodaCommands::Add {
            consumed,
            quantity,
            date,
            notes,
        } => {
            let entry = SodaEntry {
                date: ctx.entry_date(date.as_deref())?,
                consumed,
                quantity,
                notes: notes.unwrap_or_default(),
            };
            entries::add(ctx, entry)
        }
        SodaCommands::Get { date } => entries::get::<SodaEntry>(ctx, date.as_deref()),
        SodaCommands::List(range) => entries::list::<SodaEntry>(ctx, &range),
        SodaCommands::Update {
            date,
            consumed,
            not_consumed,
            quantity,
            notes,
        } => {
            if consumed && not_consumed {
                return Err(ValidationError::ConflictingFlags(
                    "consumed".to_string(),
                    "not-consumed".to_string(),
                )
                .into());
            }
            entries::update(ctx, &date, false, |original: &SodaEntry| {
                let mut entry = original.clone();
                if consumed {
                    entry.consumed = true;
                }
                if not_consumed {
                    entry.consumed = false;
                    entry.quantity = quantity.unwrap_or(0.0);
                }
                if let Some(quantity) = quantity {
                    entry.quantity = quantity;
                }
                if let Some(notes) = notes {
                    entry.notes = notes;
                }
                Ok(entry)
            })
        }
        SodaCommands::Delete { date } => entries::delete::<SodaEntry>(ctx, &date),
    }
}
