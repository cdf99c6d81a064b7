//! Structured configuration issues.
//!
//! Validation never fails outright: it collects every problem it finds so the
//! CLI can print them all at once and decide whether to continue.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A required string field is empty
    EmptyField { field: String },
    /// A numeric field is zero where that makes no sense
    ZeroValue { field: String },
    /// A string field holds a value outside its allowed set
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// Two simulated agents share an id
    DuplicateAgent { id: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Check that a string field is non-empty
pub(crate) fn require_non_empty(field: &str, value: &str, issues: &mut Vec<ConfigIssue>) {
    if value.trim().is_empty() {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::EmptyField {
                field: field.to_string(),
            },
            format!("{}: must not be empty", field),
        ));
    }
}

/// Check that a numeric field is non-zero
pub(crate) fn require_non_zero(field: &str, value: u64, issues: &mut Vec<ConfigIssue>) {
    if value == 0 {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::ZeroValue {
                field: field.to_string(),
            },
            format!("{}: must be greater than 0", field),
        ));
    }
}
