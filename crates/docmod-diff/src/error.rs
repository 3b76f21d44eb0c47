//! Error types for the diff crate.

/// Errors that can occur before a comparison starts.
///
/// A comparison itself never fails: stream read problems, depth cutoffs and
/// type-shape changes are reported as warnings on the result.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A revision handed to a catalog-rooted comparison has no catalog.
    #[error("{revision} revision has no catalog")]
    MissingCatalog { revision: &'static str },

    /// Comparator configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
