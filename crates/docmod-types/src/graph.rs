use std::collections::BTreeMap;

use crate::error::{TypeError, TypeResult};
use crate::number::ObjectNumber;
use crate::object::{PdfObject, Slot};

/// Read-only view over the objects of one document revision.
///
/// This is the boundary to whatever parsed the document. Implementations
/// must be immutable from the caller's point of view: resolving the same
/// number twice returns the same object.
pub trait ObjectGraph {
    /// Look up an indirect object by number.
    ///
    /// Returns `None` for numbers the revision does not define. A dangling
    /// reference is treated the same as an absent value.
    fn resolve(&self, number: ObjectNumber) -> Option<&PdfObject>;

    /// Number of the document catalog (root object), if known.
    fn catalog_number(&self) -> Option<ObjectNumber>;

    /// The document catalog.
    fn catalog(&self) -> Option<&PdfObject> {
        self.catalog_number().and_then(|n| self.resolve(n))
    }

    /// The object stored in `slot`, following a reference through this graph.
    fn value<'a>(&'a self, slot: &'a Slot) -> Option<&'a PdfObject> {
        match slot {
            Slot::Direct(object) => Some(object),
            Slot::Reference(number) => self.resolve(*number),
        }
    }
}

/// A root object together with the graph that resolves its references.
#[derive(Clone, Copy)]
pub struct RootedObject<'a> {
    pub graph: &'a dyn ObjectGraph,
    pub root: &'a PdfObject,
}

impl<'a> RootedObject<'a> {
    pub fn new(graph: &'a dyn ObjectGraph, root: &'a PdfObject) -> Self {
        Self { graph, root }
    }

    /// Root the graph at its catalog, if it has one.
    pub fn catalog(graph: &'a dyn ObjectGraph) -> Option<Self> {
        graph.catalog().map(|root| Self { graph, root })
    }
}

// ---------------------------------------------------------------------------
// Revision
// ---------------------------------------------------------------------------

/// In-memory object table of one revision.
///
/// Applying an incremental update is modelled by cloning the signed
/// revision and calling [`Revision::update`] for every object the update
/// section redefines.
#[derive(Clone, Debug, Default)]
pub struct Revision {
    objects: BTreeMap<ObjectNumber, PdfObject>,
    catalog: Option<ObjectNumber>,
}

impl Revision {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new object. Fails if the number is already in use.
    pub fn insert(&mut self, number: ObjectNumber, object: impl Into<PdfObject>) -> TypeResult<()> {
        if self.objects.contains_key(&number) {
            return Err(TypeError::DuplicateObject(number));
        }
        self.objects.insert(number, object.into());
        Ok(())
    }

    /// Define or redefine an object, returning the previous definition.
    pub fn update(&mut self, number: ObjectNumber, object: impl Into<PdfObject>) -> Option<PdfObject> {
        self.objects.insert(number, object.into())
    }

    /// Drop an object definition (a free entry in the cross-reference table).
    pub fn remove(&mut self, number: ObjectNumber) -> Option<PdfObject> {
        self.objects.remove(&number)
    }

    /// Mark an already defined object as the document catalog.
    pub fn set_catalog(&mut self, number: ObjectNumber) -> TypeResult<()> {
        if !self.objects.contains_key(&number) {
            return Err(TypeError::MissingObject(number));
        }
        self.catalog = Some(number);
        Ok(())
    }

    pub fn get_mut(&mut self, number: ObjectNumber) -> Option<&mut PdfObject> {
        self.objects.get_mut(&number)
    }

    /// Defined object numbers in ascending order.
    pub fn numbers(&self) -> impl Iterator<Item = ObjectNumber> + '_ {
        self.objects.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectGraph for Revision {
    fn resolve(&self, number: ObjectNumber) -> Option<&PdfObject> {
        self.objects.get(&number)
    }

    fn catalog_number(&self) -> Option<ObjectNumber> {
        self.catalog
    }
}
