use std::io::{BufRead, Write};

/// A yes/no question put to the operator, with everything they should see first.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Confirmation {
    pub question: String,
    pub warnings: Vec<String>,
    pub details: Vec<String>,
}

impl Confirmation {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    pub fn with_warnings(mut self, warnings: &[String]) -> Self {
        self.warnings.extend_from_slice(warnings);
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// Source of operator answers.
pub(crate) trait Confirm {
    /// Returns true only on an explicit yes.
    fn confirm(&self, confirmation: &Confirmation) -> bool;
}

/// Prompts on stderr and reads one line from stdin. Blocks until answered.
pub(crate) struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&self, confirmation: &Confirmation) -> bool {
        ask(
            &mut std::io::stderr().lock(),
            &mut std::io::stdin().lock(),
            confirmation,
        )
    }
}

/// Show the confirmation on `out` and read one answer line from `input`.
///
/// An unwritable prompt or unreadable answer counts as no.
fn ask(out: &mut impl Write, input: &mut impl BufRead, confirmation: &Confirmation) -> bool {
    if let Err(e) = write_prompt(out, confirmation) {
        tracing::warn!(error = %e, "failed to show confirmation, treating as no");
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read confirmation, treating as no");
            false
        }
    }
}

fn write_prompt(out: &mut impl Write, confirmation: &Confirmation) -> std::io::Result<()> {
    for line in &confirmation.details {
        writeln!(out, "{line}")?;
    }
    for warning in &confirmation.warnings {
        writeln!(out, "warning: {warning}")?;
    }
    write!(out, "{} (y/N): ", confirmation.question)?;
    out.flush()
}

/// Answers yes without prompting (`--yes`).
pub(crate) struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, confirmation: &Confirmation) -> bool {
        tracing::info!(
            question = %confirmation.question,
            warnings = confirmation.warnings.len(),
            "confirmation answered by --yes"
        );
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
