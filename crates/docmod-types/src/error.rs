use thiserror::Error;

use crate::number::ObjectNumber;

/// Errors produced while building or addressing an object graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object number: {0}")]
    InvalidObjectNumber(String),

    #[error("object {0} is already defined in this revision")]
    DuplicateObject(ObjectNumber),

    #[error("object {0} is not defined in this revision")]
    MissingObject(ObjectNumber),
}

/// Convenience alias for object model results.
pub type TypeResult<T> = Result<T, TypeError>;
