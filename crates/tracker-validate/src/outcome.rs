use tracker_core::ValidationError;

/// Result of validating one candidate entry. Never persisted.
///
/// `is_valid == false` always carries an `error`. Warnings are advisory and
/// accumulate across every check that ran before evaluation stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub error: Option<ValidationError>,
    pub warnings: Vec<String>,
    /// The candidate's date matches an existing entry.
    pub is_duplicate: bool,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
            warnings: Vec::new(),
            is_duplicate: false,
        }
    }

    pub fn rejected(error: impl Into<ValidationError>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
            warnings: Vec::new(),
            is_duplicate: false,
        }
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Fold a sub-check's outcome into this one.
    pub fn merge(&mut self, other: ValidationOutcome) {
        self.warnings.extend(other.warnings);
        self.is_duplicate |= other.is_duplicate;
        if !other.is_valid && self.is_valid {
            self.is_valid = false;
            self.error = other.error;
        }
    }

    /// Mark this outcome rejected, keeping the warnings gathered so far.
    pub fn reject(&mut self, error: impl Into<ValidationError>) {
        self.is_valid = false;
        self.error = Some(error.into());
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Convert to a `Result`, yielding the warnings when the candidate is acceptable.
    pub fn into_result(self) -> Result<Vec<String>, ValidationError> {
        match (self.is_valid, self.error) {
            (false, Some(error)) => Err(error),
            (_, _) => Ok(self.warnings),
        }
    }
}
