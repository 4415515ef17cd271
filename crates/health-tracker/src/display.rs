use tracker_core::{
    AppError, ExerciseEntry, FastingEntry, OutputFormat, Record, SodaEntry, WeightEntry,
};

use crate::result::{CommandResult, Status};

/// Text rendering for one entry type.
pub(crate) trait EntryView: Record {
    /// Capitalized noun used in messages, e.g. "Weight".
    const NOUN: &'static str;

    /// One labelled field per line.
    fn detail_lines(&self) -> Vec<String>;

    fn table_header() -> String;

    fn table_row(&self) -> String;
}

impl EntryView for WeightEntry {
    const NOUN: &'static str = "Weight";

    fn detail_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("  ID:     {}", self.id),
            format!("  Date:   {}", self.date),
            format!("  Weight: {:.1} lbs", self.weight),
        ];
        if !self.notes.is_empty() {
            lines.push(format!("  Notes:  {}", self.notes));
        }
        lines
    }

    fn table_header() -> String {
        format!("{:<8}  {:<10}  {:>7}  NOTES", "ID", "DATE", "WEIGHT")
    }

    fn table_row(&self) -> String {
        format!(
            "{:<8}  {:<10}  {:>7.1}  {}",
            self.id,
            self.date,
            self.weight,
            truncate(&self.notes, 40)
        )
    }
}

impl EntryView for ExerciseEntry {
    const NOUN: &'static str = "Exercise";

    fn detail_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("  Date:       {}", self.date),
            format!("  Activity:   {}", self.activity_label()),
            format!("  Duration:   {} minutes", self.duration),
        ];
        if !self.notes.is_empty() {
            lines.push(format!("  Notes:      {}", self.notes));
        }
        lines.push(format!("  Completed:  {}", yes_no(self.completed)));
        lines
    }

    fn table_header() -> String {
        format!(
            "{:<10}  {:<22}  {:>8}  {:<9}  NOTES",
            "DATE", "ACTIVITY", "MINUTES", "COMPLETED"
        )
    }

    fn table_row(&self) -> String {
        format!(
            "{:<10}  {:<22}  {:>8}  {:<9}  {}",
            self.date,
            truncate(&self.activity_label(), 22),
            self.duration,
            yes_no(self.completed),
            truncate(&self.notes, 30)
        )
    }
}

impl EntryView for FastingEntry {
    const NOUN: &'static str = "Fasting";

    fn detail_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("  Date:      {} ({})", self.date, self.date.format("%A")),
            format!("  Expected:  {}", self.expected_pattern),
            format!("  Actual:    {}", self.actual_pattern),
            format!("  Compliant: {}", yes_no(self.is_compliant())),
        ];
        if !self.notes.is_empty() {
            lines.push(format!("  Notes:     {}", self.notes));
        }
        lines
    }

    fn table_header() -> String {
        format!(
            "{:<10}  {:<3}  {:<9}  {:<9}  {:<9}  NOTES",
            "DATE", "DAY", "EXPECTED", "ACTUAL", "COMPLIANT"
        )
    }

    fn table_row(&self) -> String {
        format!(
            "{:<10}  {:<3}  {:<9}  {:<9}  {:<9}  {}",
            self.date,
            self.date.format("%a"),
            self.expected_pattern,
            self.actual_pattern,
            yes_no(self.is_compliant()),
            truncate(&self.notes, 30)
        )
    }
}

impl EntryView for SodaEntry {
    const NOUN: &'static str = "Soda";

    fn detail_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("  Date:      {} ({})", self.date, self.date.format("%A")),
            format!("  Consumed:  {}", yes_no(self.consumed)),
        ];
        if self.consumed {
            lines.push(format!("  Quantity:  {} oz", self.quantity));
        }
        lines.push(format!("  Compliant: {}", yes_no(self.is_compliant())));
        if !self.notes.is_empty() {
            lines.push(format!("  Notes:     {}", self.notes));
        }
        lines
    }

    fn table_header() -> String {
        format!(
            "{:<10}  {:<3}  {:<8}  {:>6}  {:<9}  NOTES",
            "DATE", "DAY", "CONSUMED", "OZ", "COMPLIANT"
        )
    }

    fn table_row(&self) -> String {
        format!(
            "{:<10}  {:<3}  {:<8}  {:>6}  {:<9}  {}",
            self.date,
            self.date.format("%a"),
            yes_no(self.consumed),
            self.quantity,
            yes_no(self.is_compliant()),
            truncate(&self.notes, 30)
        )
    }
}

/// Header, separator and one row per entry.
pub(crate) fn table<T: EntryView>(entries: &[T]) -> Vec<String> {
    let header = T::table_header();
    let separator = "-".repeat(header.len().max(60));
    let mut lines = Vec::with_capacity(entries.len() + 2);
    lines.push(header);
    lines.push(separator);
    lines.extend(entries.iter().map(EntryView::table_row));
    lines
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Truncate to `max` characters, marking the cut with "...".
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

pub(crate) fn render(result: &CommandResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)
            .unwrap_or_else(|e| format!(r#"{{"status":"failed","message":"{e}"}}"#)),
        OutputFormat::Text => render_text(result),
    }
}

fn render_text(result: &CommandResult) -> String {
    let mut lines = Vec::new();
    for warning in &result.warnings {
        lines.push(format!("warning: {warning}"));
    }
    match result.status {
        Status::Completed => lines.push(result.message.clone()),
        Status::Cancelled => lines.push(format!("{} (no changes made)", result.message)),
    }
    if !result.details.is_empty() {
        lines.push(String::new());
        lines.extend(result.details.iter().cloned());
    }
    lines.join("\n")
}

/// Print a finished command on stdout.
pub(crate) fn print_result(result: &CommandResult, format: OutputFormat) {
    println!("{}", render(result, format));
}

/// Report a failed command. JSON mode also emits a machine-readable object on stdout.
pub(crate) fn print_error(err: &anyhow::Error, format: OutputFormat) {
    let message = error_message(err);
    eprintln!("Error: {message}");
    if format == OutputFormat::Json {
        let body = serde_json::json!({
            "status": "failed",
            "message": message,
        });
        println!("{body}");
    }
}

/// Typed errors already name their cause; anything else gets its full context chain.
fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<AppError>() {
        Some(app) => app.to_string(),
        None => format!("{err:#}"),
    }
}
