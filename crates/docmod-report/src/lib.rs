//! Modification reports for docmod.
//!
//! The comparator only says *what* changed between two revisions. This crate
//! passes that set to a pluggable categorizer which sorts every modification
//! into a named bucket, so a validation policy further up can decide which
//! buckets are acceptable after signing.
//!
//! # Quick Start
//!
//! ```rust
//! use docmod_diff::RevisionComparator;
//! use docmod_report::ModificationReportBuilder;
//! use docmod_types::{ObjectNumber, PdfDict, PdfObject, Revision};
//!
//! let mut original = Revision::new();
//! original
//!     .insert(ObjectNumber::new(1), PdfDict::new().with("Type", PdfObject::name("Catalog")))
//!     .unwrap();
//! original.set_catalog(ObjectNumber::new(1)).unwrap();
//!
//! let mut revised = original.clone();
//! revised.update(
//!     ObjectNumber::new(1),
//!     PdfDict::new()
//!         .with("Type", PdfObject::name("Catalog"))
//!         .with("DSS", PdfDict::new()),
//! );
//!
//! let builder = ModificationReportBuilder::with_default_rules();
//! let report = builder
//!     .run(&RevisionComparator::default(), &original, &revised)
//!     .unwrap();
//! assert_eq!(report.categories.bucket("extension").len(), 1);
//! ```

pub mod builder;
pub mod categorizer;
pub mod config;
pub mod error;
pub mod rules;

// Re-exports for convenience.
pub use builder::{ModificationReport, ModificationReportBuilder};
pub use categorizer::{CategorizedModifications, ModificationCategorizer};
pub use config::{
    CategorizerConfig, CategoryRule, ANNOTATION_BUCKET, EXTENSION_BUCKET, FALLBACK_BUCKET,
    SIGNATURE_OR_FORM_FILL_BUCKET,
};
pub use error::{ReportError, ReportResult};
pub use rules::RuleCategorizer;
