use thiserror::Error;

/// Reasons a recurrence rule is rejected at parse time.
///
/// Every variant carries enough of the input to reproduce the failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Recurrence rule is empty")]
    EmptyRule,

    #[error("Malformed recurrence rule '{rule}': {reason}")]
    MalformedRule { rule: String, reason: &'static str },

    #[error("Value '{value}' in recurrence rule '{rule}' is out of range, expected {expected}")]
    OutOfRange {
        rule: String,
        value: String,
        expected: &'static str,
    },

    #[error("Unknown recurrence rule kind '{kind}' in '{rule}'")]
    UnknownRuleKind { rule: String, kind: String },

    #[error("Recurrence rule '{rule}' never matches a calendar date")]
    NeverOccurs { rule: String },
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("Invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),

    #[error("Task not found: {0}")]
    NotFound(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Task {0} was modified concurrently, try again")]
    Conflict(i64),
}
