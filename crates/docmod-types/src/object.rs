use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::number::ObjectNumber;
use crate::stream::RawStream;

// ---------------------------------------------------------------------------
// SimpleValue
// ---------------------------------------------------------------------------

/// A scalar value.
///
/// Strings are kept as raw bytes since they routinely carry binary data
/// (signature contents, identifiers). Equality and hashing on `Real` go
/// through the bit pattern so `SimpleValue` can live in hashed collections.
#[derive(Clone, Debug)]
pub enum SimpleValue {
    String(Vec<u8>),
    Name(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
}

/// Sub-type of a scalar, used to decide whether two scalars are comparable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Name,
    Number,
    Boolean,
}

impl SimpleValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::String(_) => ScalarKind::String,
            Self::Name(_) => ScalarKind::Name,
            Self::Integer(_) | Self::Real(_) => ScalarKind::Number,
            Self::Boolean(_) => ScalarKind::Boolean,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Name(_) => "Name",
            Self::Integer(_) => "Integer",
            Self::Real(_) => "Real",
            Self::Boolean(_) => "Boolean",
        }
    }

    /// Numeric value promoted to a real, if this is a number.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }
}

impl PartialEq for SimpleValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Name(a), Self::Name(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a.to_bits() == b.to_bits(),
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for SimpleValue {}

impl Hash for SimpleValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::String(s) => s.hash(state),
            Self::Name(n) => n.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Real(r) => r.to_bits().hash(state),
            Self::Boolean(b) => b.hash(state),
        }
    }
}

impl fmt::Display for SimpleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) if !text.chars().any(char::is_control) => write!(f, "({text})"),
                _ => write!(f, "<{}>", hex::encode(bytes)),
            },
            Self::Name(name) => write!(f, "/{name}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r:?}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// Storage slot of a dictionary entry or array element.
///
/// A slot either embeds its object or refers to an indirect object that the
/// owning [`ObjectGraph`](crate::ObjectGraph) resolves.
#[derive(Clone, Debug)]
pub enum Slot {
    Direct(PdfObject),
    Reference(ObjectNumber),
}

impl Slot {
    /// Object number if this slot is an indirect reference.
    pub fn object_number(&self) -> Option<ObjectNumber> {
        match self {
            Self::Direct(_) => None,
            Self::Reference(number) => Some(*number),
        }
    }
}

impl From<PdfObject> for Slot {
    fn from(object: PdfObject) -> Self {
        Self::Direct(object)
    }
}

impl From<ObjectNumber> for Slot {
    fn from(number: ObjectNumber) -> Self {
        Self::Reference(number)
    }
}

// ---------------------------------------------------------------------------
// PdfDict
// ---------------------------------------------------------------------------

/// Dictionary object with an optional attached raw stream.
///
/// Keys keep their declared order. The order carries no meaning for
/// comparison but makes every traversal deterministic.
#[derive(Clone, Debug, Default)]
pub struct PdfDict {
    entries: IndexMap<String, Slot>,
    stream: Option<RawStream>,
}

impl PdfDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a direct entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PdfObject>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder: add an indirect reference entry.
    pub fn with_ref(mut self, key: impl Into<String>, number: ObjectNumber) -> Self {
        self.insert_reference(key, number);
        self
    }

    /// Builder: attach a raw stream.
    pub fn with_stream(mut self, stream: RawStream) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Insert a direct entry, returning the previous slot for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PdfObject>) -> Option<Slot> {
        self.entries.insert(key.into(), Slot::Direct(value.into()))
    }

    /// Insert an indirect reference, returning the previous slot for `key`.
    pub fn insert_reference(&mut self, key: impl Into<String>, number: ObjectNumber) -> Option<Slot> {
        self.entries.insert(key.into(), Slot::Reference(number))
    }

    /// Remove an entry, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Slot> {
        self.entries.shift_remove(key)
    }

    pub fn set_stream(&mut self, stream: Option<RawStream>) {
        self.stream = stream;
    }

    /// Keys in declared order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn slot(&self, key: &str) -> Option<&Slot> {
        self.entries.get(key)
    }

    /// Object number of the entry if it is an indirect reference.
    pub fn object_number(&self, key: &str) -> Option<ObjectNumber> {
        self.slot(key).and_then(Slot::object_number)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stream(&self) -> Option<&RawStream> {
        self.stream.as_ref()
    }
}

// ---------------------------------------------------------------------------
// PdfArray
// ---------------------------------------------------------------------------

/// Ordered array object. Element order is significant.
#[derive(Clone, Debug, Default)]
pub struct PdfArray {
    items: Vec<Slot>,
}

impl PdfArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a direct element.
    pub fn with(mut self, value: impl Into<PdfObject>) -> Self {
        self.push(value);
        self
    }

    /// Builder: append an indirect reference.
    pub fn with_ref(mut self, number: ObjectNumber) -> Self {
        self.push_reference(number);
        self
    }

    pub fn push(&mut self, value: impl Into<PdfObject>) {
        self.items.push(Slot::Direct(value.into()));
    }

    pub fn push_reference(&mut self, number: ObjectNumber) {
        self.items.push(Slot::Reference(number));
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.items.get(index)
    }

    /// Object number of the element if it is an indirect reference.
    pub fn object_number(&self, index: usize) -> Option<ObjectNumber> {
        self.get(index).and_then(Slot::object_number)
    }

    /// Index of the last element referring to `number`.
    pub fn rposition_of(&self, number: ObjectNumber) -> Option<usize> {
        self.items
            .iter()
            .rposition(|slot| slot.object_number() == Some(number))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Slot> for PdfArray {
    fn from_iter<I: IntoIterator<Item = Slot>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// PdfObject
// ---------------------------------------------------------------------------

/// A parsed document object.
///
/// Indirect references never appear as a variant of their own: they live in
/// [`Slot`]s and are resolved by the graph, which keeps cyclic documents
/// representable without shared ownership.
#[derive(Clone, Debug)]
pub enum PdfObject {
    Dictionary(PdfDict),
    Array(PdfArray),
    Simple(SimpleValue),
}

impl PdfObject {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Simple(SimpleValue::Name(name.into()))
    }

    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Simple(SimpleValue::String(bytes.into()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Dictionary(_) => "Dictionary",
            Self::Array(_) => "Array",
            Self::Simple(value) => value.type_name(),
        }
    }

    /// Returns `true` for dictionaries and arrays.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Dictionary(_) | Self::Array(_))
    }

    pub fn as_dict(&self) -> Option<&PdfDict> {
        match self {
            Self::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&PdfArray> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleValue> {
        match self {
            Self::Simple(value) => Some(value),
            _ => None,
        }
    }
}

impl From<PdfDict> for PdfObject {
    fn from(dict: PdfDict) -> Self {
        Self::Dictionary(dict)
    }
}

impl From<PdfArray> for PdfObject {
    fn from(array: PdfArray) -> Self {
        Self::Array(array)
    }
}

impl From<SimpleValue> for PdfObject {
    fn from(value: SimpleValue) -> Self {
        Self::Simple(value)
    }
}

impl From<i64> for PdfObject {
    fn from(value: i64) -> Self {
        Self::Simple(SimpleValue::Integer(value))
    }
}

impl From<f64> for PdfObject {
    fn from(value: f64) -> Self {
        Self::Simple(SimpleValue::Real(value))
    }
}

impl From<bool> for PdfObject {
    fn from(value: bool) -> Self {
        Self::Simple(SimpleValue::Boolean(value))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn dict_keeps_declared_order() {
        let dict = PdfDict::new()
            .with("Type", PdfObject::name("Page"))
            .with("Rotate", 0i64)
            .with_ref("Parent", ObjectNumber::new(3));
        let keys: Vec<_> = dict.keys().collect();
        assert_eq!(keys, vec!["Type", "Rotate", "Parent"]);
    }

    #[test]
    fn dict_remove_preserves_order() {
        let mut dict = PdfDict::new().with("A", 1i64).with("B", 2i64).with("C", 3i64);
        dict.remove("A");
        let keys: Vec<_> = dict.keys().collect();
        assert_eq!(keys, vec!["B", "C"]);
    }

    #[test]
    fn object_numbers_only_for_references() {
        let dict = PdfDict::new()
            .with("Direct", 5i64)
            .with_ref("Indirect", ObjectNumber::new(12));
        assert_eq!(dict.object_number("Direct"), None);
        assert_eq!(dict.object_number("Indirect"), Some(ObjectNumber::new(12)));
        assert_eq!(dict.object_number("Missing"), None);
    }

    #[test]
    fn array_reference_lookup_takes_last_match() {
        let array = PdfArray::new()
            .with_ref(ObjectNumber::new(4))
            .with(1i64)
            .with_ref(ObjectNumber::new(4));
        assert_eq!(array.rposition_of(ObjectNumber::new(4)), Some(2));
        assert_eq!(array.rposition_of(ObjectNumber::new(9)), None);
        assert_eq!(array.object_number(1), None);
    }

    #[test]
    fn scalar_kinds_group_numbers() {
        assert_eq!(SimpleValue::Integer(1).kind(), ScalarKind::Number);
        assert_eq!(SimpleValue::Real(1.5).kind(), ScalarKind::Number);
        assert_ne!(
            SimpleValue::Name("A".into()).kind(),
            SimpleValue::String(b"A".to_vec()).kind()
        );
    }

    #[test]
    fn scalar_equality_is_exact() {
        assert_ne!(SimpleValue::Integer(612), SimpleValue::Real(612.0));
        assert_eq!(SimpleValue::Real(0.5), SimpleValue::Real(0.5));
        assert_ne!(SimpleValue::Real(0.0), SimpleValue::Real(-0.0));
    }

    #[test]
    fn scalars_hash_consistently() {
        let mut set = HashSet::new();
        set.insert(SimpleValue::Real(1.25));
        set.insert(SimpleValue::Real(1.25));
        set.insert(SimpleValue::Name("X".into()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn scalar_display() {
        assert_eq!(SimpleValue::Name("Catalog".into()).to_string(), "/Catalog");
        assert_eq!(SimpleValue::String(b"Hello".to_vec()).to_string(), "(Hello)");
        assert_eq!(SimpleValue::String(vec![0x00, 0xff]).to_string(), "<00ff>");
        assert_eq!(SimpleValue::Real(612.0).to_string(), "612.0");
        assert_eq!(SimpleValue::Integer(-3).to_string(), "-3");
    }

    #[test]
    fn promotion_to_real() {
        assert_eq!(SimpleValue::Integer(612).as_real(), Some(612.0));
        assert_eq!(SimpleValue::Boolean(true).as_real(), None);
    }

    #[test]
    fn containers_are_containers() {
        assert!(PdfObject::from(PdfDict::new()).is_container());
        assert!(PdfObject::from(PdfArray::new()).is_container());
        assert!(!PdfObject::from(true).is_container());
        assert_eq!(PdfObject::from(2.5).type_name(), "Real");
    }
}
