use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Status {
    Completed,
    /// The operator declined a confirmation; nothing was changed.
    Cancelled,
}

/// Outcome of one command, rendered by `display` as text or JSON.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CommandResult {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
    /// Text-mode body lines. JSON output carries `data` instead.
    #[serde(skip)]
    pub details: Vec<String>,
}

impl CommandResult {
    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Completed,
            message: message.into(),
            warnings: Vec::new(),
            data: serde_json::Value::Null,
            details: Vec::new(),
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self {
            status: Status::Cancelled,
            ..Self::completed(message)
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_data<T: Serialize>(mut self, data: &T) -> Self {
        self.data = serde_json::to_value(data).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to encode result data");
            serde_json::Value::Null
        });
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn exit_code(&self) -> i32 {
        match self.status {
            Status::Completed => 0,
            Status::Cancelled => 1,
        }
    }
}
