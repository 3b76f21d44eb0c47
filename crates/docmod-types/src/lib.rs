//! Object model for docmod.
//!
//! This crate provides the read-only document object graph consumed by the
//! revision comparator. Every other docmod crate depends on `docmod-types`.
//!
//! # Key Types
//!
//! - [`PdfObject`] -- Closed sum over dictionary, array and scalar objects
//! - [`Slot`] -- A dictionary entry or array element: direct object or indirect reference
//! - [`ObjectNumber`] -- Number of an indirect object
//! - [`RawStream`] / [`StreamSource`] -- Raw (undecoded) stream payloads read on demand
//! - [`ObjectGraph`] -- Provider interface resolving references within one revision
//! - [`Revision`] -- In-memory `ObjectGraph`

pub mod error;
pub mod graph;
pub mod number;
pub mod object;
pub mod stream;

pub use error::{TypeError, TypeResult};
pub use graph::{ObjectGraph, Revision, RootedObject};
pub use number::ObjectNumber;
pub use object::{PdfArray, PdfDict, PdfObject, ScalarKind, SimpleValue, Slot};
pub use stream::{FileRangeSource, InMemorySource, RawStream, StreamSource};
