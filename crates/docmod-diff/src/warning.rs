use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::ObjectPath;

/// Condition noticed during a comparison that the caller must see.
///
/// Warnings never stop the comparison. A [`DepthExceeded`] warning means the
/// modification set is a lower bound: what was found is real, but the
/// abandoned branch may hide more.
///
/// [`DepthExceeded`]: ComparisonWarning::DepthExceeded
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonWarning {
    /// A branch was longer than the configured limit and was skipped.
    DepthExceeded { path: ObjectPath, limit: usize },
    /// The object changed shape (container vs scalar, or scalar sub-type).
    TypeMismatch {
        path: ObjectPath,
        original: String,
        revised: String,
    },
    /// Raw stream bytes of either revision could not be read.
    StreamUnreadable { path: ObjectPath, reason: String },
}

impl ComparisonWarning {
    pub fn path(&self) -> &ObjectPath {
        match self {
            Self::DepthExceeded { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::StreamUnreadable { path, .. } => path,
        }
    }

    /// Whether this warning makes the modification set incomplete.
    pub fn truncates(&self) -> bool {
        matches!(self, Self::DepthExceeded { .. })
    }
}

impl fmt::Display for ComparisonWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DepthExceeded { path, limit } => {
                write!(f, "maximum deepness {limit} reached at '{path}', branch skipped")
            }
            Self::TypeMismatch {
                path,
                original,
                revised,
            } => write!(f, "object at '{path}' changed type from {original} to {revised}"),
            Self::StreamUnreadable { path, reason } => {
                write!(f, "unable to compare stream at '{path}': {reason}")
            }
        }
    }
}
