use std::fmt;

use docmod_diff::DiffError;

/// Errors that can occur while building a modification report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The categorizer rule set is unusable.
    #[error("invalid categorizer rules: {0}")]
    InvalidRules(String),

    /// Categorizer configuration could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Config(String),

    /// The underlying comparison could not start.
    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Convenience alias for report results.
pub type ReportResult<T> = Result<T, ReportError>;

impl PartialEq for ReportError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by display representation for test convenience.
        fmt::format(format_args!("{self}")) == fmt::format(format_args!("{other}"))
    }
}

impl Eq for ReportError {}
