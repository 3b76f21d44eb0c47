//! Modification records and the ordered set that collects them.

use std::fmt;

use docmod_types::{PdfArray, PdfDict, PdfObject, SimpleValue};
use indexmap::IndexMap;

use crate::path::ObjectPath;

// ---------------------------------------------------------------------------
// ModifiedValue
// ---------------------------------------------------------------------------

/// Borrowed view of an object carried by a modification.
///
/// Containers compare by identity (two records describe the same container
/// only if they point at the same object); scalars compare by value.
#[derive(Clone, Copy, Debug)]
pub enum ModifiedValue<'a> {
    Dictionary(&'a PdfDict),
    Array(&'a PdfArray),
    Scalar(&'a SimpleValue),
}

impl<'a> ModifiedValue<'a> {
    pub fn from_object(object: &'a PdfObject) -> Self {
        match object {
            PdfObject::Dictionary(dict) => Self::Dictionary(dict),
            PdfObject::Array(array) => Self::Array(array),
            PdfObject::Simple(value) => Self::Scalar(value),
        }
    }

    pub fn as_scalar(&self) -> Option<&'a SimpleValue> {
        match *self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Dictionary(_) => "Dictionary",
            Self::Array(_) => "Array",
            Self::Scalar(value) => value.type_name(),
        }
    }
}

impl PartialEq for ModifiedValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Dictionary(a), Self::Dictionary(b)) => std::ptr::eq(*a, *b),
            (Self::Array(a), Self::Array(b)) => std::ptr::eq(*a, *b),
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ModifiedValue<'_> {}

impl fmt::Display for ModifiedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dictionary(dict) => write!(f, "<<{} entries>>", dict.len()),
            Self::Array(array) => write!(f, "[{} elements]", array.len()),
            Self::Scalar(value) => write!(f, "{value}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ObjectModification
// ---------------------------------------------------------------------------

/// Kind of a modification record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModificationKind {
    Created,
    Deleted,
    Updated,
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Deleted => write!(f, "deleted"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

/// One structural difference between the original and the final revision.
///
/// Stream records carry no value: the path (with its stream marker) and
/// the kind are all a stream change reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectModification<'a> {
    Created {
        path: ObjectPath,
        value: Option<ModifiedValue<'a>>,
    },
    Deleted {
        path: ObjectPath,
        value: Option<ModifiedValue<'a>>,
    },
    Updated {
        path: ObjectPath,
        old: Option<ModifiedValue<'a>>,
        new: Option<ModifiedValue<'a>>,
    },
}

impl<'a> ObjectModification<'a> {
    pub fn created(path: ObjectPath, value: Option<ModifiedValue<'a>>) -> Self {
        Self::Created { path, value }
    }

    pub fn deleted(path: ObjectPath, value: Option<ModifiedValue<'a>>) -> Self {
        Self::Deleted { path, value }
    }

    pub fn updated(
        path: ObjectPath,
        old: Option<ModifiedValue<'a>>,
        new: Option<ModifiedValue<'a>>,
    ) -> Self {
        Self::Updated { path, old, new }
    }

    pub fn kind(&self) -> ModificationKind {
        match self {
            Self::Created { .. } => ModificationKind::Created,
            Self::Deleted { .. } => ModificationKind::Deleted,
            Self::Updated { .. } => ModificationKind::Updated,
        }
    }

    pub fn path(&self) -> &ObjectPath {
        match self {
            Self::Created { path, .. } | Self::Deleted { path, .. } | Self::Updated { path, .. } => {
                path
            }
        }
    }

    /// Value in the original revision, if the record carries one.
    pub fn old_value(&self) -> Option<ModifiedValue<'a>> {
        match self {
            Self::Created { .. } => None,
            Self::Deleted { value, .. } => *value,
            Self::Updated { old, .. } => *old,
        }
    }

    /// Value in the final revision, if the record carries one.
    pub fn new_value(&self) -> Option<ModifiedValue<'a>> {
        match self {
            Self::Created { value, .. } => *value,
            Self::Deleted { .. } => None,
            Self::Updated { new, .. } => *new,
        }
    }

    /// Whether the record describes a raw stream rather than an object.
    pub fn is_stream(&self) -> bool {
        self.path().is_stream()
    }

    /// Whether something absent from the original appeared in the final
    /// revision: a created container, or a scalar updated from nothing.
    pub fn is_addition(&self) -> bool {
        match self {
            Self::Created { .. } => true,
            Self::Updated { old, new, .. } => old.is_none() && new.is_some(),
            Self::Deleted { .. } => false,
        }
    }

    /// Whether something present in the original is gone from the final
    /// revision: a deleted container, or a scalar updated to nothing.
    pub fn is_removal(&self) -> bool {
        match self {
            Self::Deleted { .. } => true,
            Self::Updated { old, new, .. } => old.is_some() && new.is_none(),
            Self::Created { .. } => false,
        }
    }
}

impl fmt::Display for ObjectModification<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |value: Option<ModifiedValue<'_>>| match value {
            Some(v) => v.to_string(),
            None => "-".to_string(),
        };
        match self {
            Self::Created { path, value } => write!(f, "created {path}: {}", show(*value)),
            Self::Deleted { path, value } => write!(f, "deleted {path}: {}", show(*value)),
            Self::Updated { path, old, new } => {
                write!(f, "updated {path}: {} -> {}", show(*old), show(*new))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ModificationSet
// ---------------------------------------------------------------------------

/// Insertion-ordered, path-keyed collection of modifications.
///
/// At most one record exists per path. Inserting an equal record is a
/// no-op. A `Created` and a `Deleted` record meeting at one path (an array
/// slot whose referenced object was replaced) fold into a single `Updated`
/// record that keeps the first record's position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModificationSet<'a> {
    records: IndexMap<ObjectPath, ObjectModification<'a>>,
}

impl<'a> ModificationSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Returns `true` if the set changed.
    pub fn insert(&mut self, modification: ObjectModification<'a>) -> bool {
        let path = modification.path().clone();
        match self.records.get_mut(&path) {
            None => {
                self.records.insert(path, modification);
                true
            }
            Some(existing) if existing.kind() == modification.kind() => {
                // Same kind at the same path: the first record stands.
                false
            }
            Some(existing) => {
                let merged = ObjectModification::updated(
                    path,
                    existing.old_value().or(modification.old_value()),
                    existing.new_value().or(modification.new_value()),
                );
                if *existing == merged {
                    return false;
                }
                *existing = merged;
                true
            }
        }
    }

    pub fn get(&self, path: &ObjectPath) -> Option<&ObjectModification<'a>> {
        self.records.get(path)
    }

    /// Look up a record by its rendered path.
    pub fn find(&self, rendered_path: &str) -> Option<&ObjectModification<'a>> {
        self.records
            .values()
            .find(|m| m.path().to_string() == rendered_path)
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectModification<'a>> {
        self.records.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &ObjectPath> {
        self.records.keys()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, kind: ModificationKind) -> usize {
        self.iter().filter(|m| m.kind() == kind).count()
    }

    pub fn created(&self) -> usize {
        self.count(ModificationKind::Created)
    }

    pub fn deleted(&self) -> usize {
        self.count(ModificationKind::Deleted)
    }

    pub fn updated(&self) -> usize {
        self.count(ModificationKind::Updated)
    }

    pub fn into_vec(self) -> Vec<ObjectModification<'a>> {
        self.records.into_values().collect()
    }
}

impl<'a> IntoIterator for ModificationSet<'a> {
    type Item = ObjectModification<'a>;
    type IntoIter = indexmap::map::IntoValues<ObjectPath, ObjectModification<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_values()
    }
}

impl<'s, 'a> IntoIterator for &'s ModificationSet<'a> {
    type Item = &'s ObjectModification<'a>;
    type IntoIter = indexmap::map::Values<'s, ObjectPath, ObjectModification<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}
