//! Revision comparator for docmod.
//!
//! Compares the object graph of an original revision against the object
//! graph of a final revision and reports every structural difference as a
//! path-addressed modification record.
//!
//! # Key Types
//!
//! - [`RevisionComparator`] / [`ComparatorConfig`] -- Entry point and its settings
//! - [`ComparisonReport`] -- Modifications plus the warnings raised while walking
//! - [`ObjectModification`] / [`ModificationSet`] -- Created, deleted and updated records keyed by path
//! - [`ObjectPath`] -- Key/index route from the root, with an optional stream marker
//! - [`ComparisonWarning`] -- Depth cut-offs, shape changes and unreadable streams

pub mod comparator;
pub mod config;
pub mod error;
pub mod modification;
pub mod path;
pub mod stream;
pub mod tracker;
pub mod warning;

pub use comparator::{ComparisonReport, RevisionComparator};
pub use config::{ComparatorConfig, DEFAULT_MAX_DEEPNESS};
pub use error::{DiffError, DiffResult};
pub use modification::{ModificationKind, ModificationSet, ModifiedValue, ObjectModification};
pub use path::{ObjectPath, PathSegment, CATALOG_LABEL};
pub use stream::{compare_raw_streams, StreamDifference};
pub use warning::ComparisonWarning;
