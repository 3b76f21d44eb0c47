//! Lock-step structural comparison of two revision object graphs.
//!
//! The comparator walks the original and the final revision from a pair of
//! roots and records every difference it meets:
//!
//! - a value only in the final revision is `Created` (containers) or
//!   `Updated` from nothing (scalars), and symmetrically for removals;
//! - dictionaries are compared key by key, then their raw streams;
//! - array elements are paired by object number when either side carries
//!   one, by position otherwise, and the pairing runs from both sides;
//! - scalars of the same sub-type are compared by value, anything else is
//!   a shape change and is reported with a warning.
//!
//! The walk is bounded by [`ComparatorConfig::max_deepness`] and by the
//! visited-reference guard, so cyclic and hostile graphs terminate.

use docmod_types::{
    ObjectGraph, ObjectNumber, PdfArray, PdfDict, PdfObject, RootedObject, ScalarKind, SimpleValue,
};
use tracing::{debug, warn};

use crate::config::ComparatorConfig;
use crate::error::{DiffError, DiffResult};
use crate::modification::{ModificationSet, ModifiedValue, ObjectModification};
use crate::path::{ObjectPath, CATALOG_LABEL};
use crate::stream::{compare_raw_streams, StreamDifference};
use crate::tracker::{Branch, VisitedReferences};
use crate::warning::ComparisonWarning;

// ---------------------------------------------------------------------------
// ComparisonReport
// ---------------------------------------------------------------------------

/// Result of one comparison: the modifications plus the warnings raised.
#[derive(Clone, Debug, Default)]
pub struct ComparisonReport<'a> {
    pub modifications: ModificationSet<'a>,
    pub warnings: Vec<ComparisonWarning>,
}

impl<'a> ComparisonReport<'a> {
    /// Returns `true` if no modification was found.
    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty()
    }

    /// Returns `false` if a branch was abandoned at the depth limit.
    pub fn is_complete(&self) -> bool {
        !self.warnings.iter().any(ComparisonWarning::truncates)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RevisionComparator
// ---------------------------------------------------------------------------

/// Finds the structural differences between two revisions.
///
/// The comparator holds configuration only. Every call builds its own
/// visited table and modification set, so one comparator can serve
/// concurrent comparisons from several threads.
#[derive(Clone, Debug, Default)]
pub struct RevisionComparator {
    config: ComparatorConfig,
}

/// Which revision drives an array pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Primary {
    Original,
    Revised,
}

impl RevisionComparator {
    pub fn new(config: ComparatorConfig) -> Self {
        Self { config }
    }

    pub fn with_max_deepness(mut self, max_deepness: usize) -> Self {
        self.config.max_deepness = max_deepness;
        self
    }

    pub fn with_lax_numeric_comparison(mut self, lax: bool) -> Self {
        self.config.lax_numeric_comparison = lax;
        self
    }

    pub fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    /// Compare two objects starting from an empty path.
    pub fn compare<'a>(&self, original: RootedObject<'a>, revised: RootedObject<'a>) -> ComparisonReport<'a> {
        self.run(Branch::new(ObjectPath::root()), "", None, original, revised)
    }

    /// Compare the catalogs of two revisions.
    ///
    /// Paths start with [`CATALOG_LABEL`], which counts towards the depth
    /// limit.
    pub fn compare_revisions<'a>(
        &self,
        original: &'a dyn ObjectGraph,
        revised: &'a dyn ObjectGraph,
    ) -> DiffResult<ComparisonReport<'a>> {
        let original_root = RootedObject::catalog(original)
            .ok_or(DiffError::MissingCatalog { revision: "original" })?;
        let revised_root = RootedObject::catalog(revised)
            .ok_or(DiffError::MissingCatalog { revision: "final" })?;
        Ok(self.run(
            Branch::new(ObjectPath::labelled(CATALOG_LABEL)),
            CATALOG_LABEL,
            original.catalog_number(),
            original_root,
            revised_root,
        ))
    }

    fn run<'a>(
        &self,
        mut branch: Branch,
        root_key: &str,
        root_number: Option<ObjectNumber>,
        original: RootedObject<'a>,
        revised: RootedObject<'a>,
    ) -> ComparisonReport<'a> {
        if self.config.is_disabled() {
            debug!("maximum objects verification deepness is 0, comparison skipped");
            return ComparisonReport::default();
        }

        let mut walker = Walker {
            config: &self.config,
            original: original.graph,
            revised: revised.graph,
            visited: VisitedReferences::new(),
            report: ComparisonReport::default(),
        };
        walker.visited.mark_visited(&mut branch, root_key, root_number);
        walker.compare_objects(&branch, root_key, Some(original.root), Some(revised.root));

        debug!(
            modifications = walker.report.modifications.len(),
            warnings = walker.report.warnings.len(),
            "revision comparison finished"
        );
        walker.report
    }
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// State of one comparison call.
struct Walker<'a, 'c> {
    config: &'c ComparatorConfig,
    original: &'a dyn ObjectGraph,
    revised: &'a dyn ObjectGraph,
    visited: VisitedReferences,
    report: ComparisonReport<'a>,
}

impl<'a> Walker<'a, '_> {
    fn record(&mut self, modification: ObjectModification<'a>) {
        debug!(%modification, "object modification found");
        self.report.modifications.insert(modification);
    }

    fn warn(&mut self, warning: ComparisonWarning) {
        warn!(%warning, "revision comparison warning");
        self.report.warnings.push(warning);
    }

    fn compare_objects(
        &mut self,
        branch: &Branch,
        key: &str,
        original: Option<&'a PdfObject>,
        revised: Option<&'a PdfObject>,
    ) {
        if branch.depth() > self.config.max_deepness {
            self.warn(ComparisonWarning::DepthExceeded {
                path: branch.path().clone(),
                limit: self.config.max_deepness,
            });
            return;
        }

        let path = branch.path();
        match (original, revised) {
            (None, None) => {}
            (None, Some(added)) => {
                let value = Some(ModifiedValue::from_object(added));
                if added.is_container() {
                    self.record(ObjectModification::created(path.clone(), value));
                } else {
                    self.record(ObjectModification::updated(path.clone(), None, value));
                }
            }
            (Some(removed), None) => {
                let value = Some(ModifiedValue::from_object(removed));
                if removed.is_container() {
                    self.record(ObjectModification::deleted(path.clone(), value));
                } else {
                    self.record(ObjectModification::updated(path.clone(), value, None));
                }
            }
            (Some(PdfObject::Dictionary(a)), Some(PdfObject::Dictionary(b))) => {
                self.compare_dicts(branch, a, b);
            }
            (Some(PdfObject::Array(a)), Some(PdfObject::Array(b))) => {
                self.compare_arrays(branch, key, a, b, Primary::Original);
                self.compare_arrays(branch, key, b, a, Primary::Revised);
            }
            (Some(PdfObject::Simple(a)), Some(PdfObject::Simple(b))) => {
                self.compare_scalars(path, a, b);
            }
            (Some(a), Some(b)) => self.shape_changed(path, a, b),
        }
    }

    fn compare_dicts(&mut self, branch: &Branch, original: &'a PdfDict, revised: &'a PdfDict) {
        for (key, slot) in original.iter() {
            let number = slot.object_number();
            if self.visited.is_already_visited(branch, key, number) {
                continue;
            }
            let mut child = branch.enter_key(key);
            self.visited.mark_visited(&mut child, key, number);
            let before = self.original.value(slot);
            let after = revised.slot(key).and_then(|s| self.revised.value(s));
            self.compare_objects(&child, key, before, after);
        }

        for (key, slot) in revised.iter() {
            if original.contains_key(key) {
                continue;
            }
            let mut child = branch.enter_key(key);
            let after = self.revised.value(slot);
            if after.is_some_and(PdfObject::is_container) {
                self.visited.mark_visited(&mut child, key, slot.object_number());
            }
            self.compare_objects(&child, key, None, after);
        }

        self.compare_streams(branch.path(), original, revised);
    }

    /// One pass over `primary`, pairing each element with its counterpart
    /// in `secondary`. Paths use the index in `primary`.
    ///
    /// Two direct elements at the same index are compared by the original
    /// pass only, so nested direct arrays are walked once per level.
    fn compare_arrays(
        &mut self,
        branch: &Branch,
        key: &str,
        primary: &'a PdfArray,
        secondary: &'a PdfArray,
        side: Primary,
    ) {
        let (primary_graph, secondary_graph) = match side {
            Primary::Original => (self.original, self.revised),
            Primary::Revised => (self.revised, self.original),
        };

        for (index, slot) in primary.iter().enumerate() {
            let number = slot.object_number();
            // Positional pairing only between two direct elements.
            let positional = secondary.get(index).filter(|s| s.object_number().is_none());
            if side == Primary::Revised && number.is_none() && positional.is_some() {
                continue;
            }
            let counterpart = match number {
                Some(n) => secondary.rposition_of(n).and_then(|j| secondary.get(j)),
                None => positional,
            };

            if self.visited.is_already_visited(branch, key, number) {
                continue;
            }
            let mut child = branch.enter_index(index);
            self.visited.mark_visited(&mut child, key, number);

            let here = primary_graph.value(slot);
            let there = counterpart.and_then(|s| secondary_graph.value(s));
            match side {
                Primary::Original => self.compare_objects(&child, key, here, there),
                Primary::Revised => self.compare_objects(&child, key, there, here),
            }
        }
    }

    fn compare_scalars(&mut self, path: &ObjectPath, original: &'a SimpleValue, revised: &'a SimpleValue) {
        let equal = match (original, revised) {
            (SimpleValue::String(a), SimpleValue::String(b)) => a == b,
            (SimpleValue::Name(a), SimpleValue::Name(b)) => a == b,
            (SimpleValue::Boolean(a), SimpleValue::Boolean(b)) => a == b,
            (a, b) if a.kind() == ScalarKind::Number && b.kind() == ScalarKind::Number => {
                self.numbers_equal(a, b)
            }
            _ => {
                self.warn(ComparisonWarning::TypeMismatch {
                    path: path.clone(),
                    original: original.type_name().to_string(),
                    revised: revised.type_name().to_string(),
                });
                false
            }
        };

        if !equal {
            self.record(ObjectModification::updated(
                path.clone(),
                Some(ModifiedValue::Scalar(original)),
                Some(ModifiedValue::Scalar(revised)),
            ));
        }
    }

    /// Identical values are always equal, NaN and signed zeros included.
    /// Under lax comparison an integer is promoted to a real and reals are
    /// compared at single precision, the precision writers are expected to
    /// round-trip. Without it only identical values are equal.
    fn numbers_equal(&self, a: &SimpleValue, b: &SimpleValue) -> bool {
        if a == b {
            return true;
        }
        if !self.config.lax_numeric_comparison {
            return false;
        }
        match (a, b) {
            (SimpleValue::Integer(_), SimpleValue::Integer(_)) => false,
            _ => match (a.as_real(), b.as_real()) {
                (Some(x), Some(y)) => {
                    let equal = x as f32 == y as f32;
                    if equal {
                        debug!("number changed representation without changing value");
                    }
                    equal
                }
                _ => false,
            },
        }
    }

    fn shape_changed(&mut self, path: &ObjectPath, original: &'a PdfObject, revised: &'a PdfObject) {
        self.warn(ComparisonWarning::TypeMismatch {
            path: path.clone(),
            original: original.type_name().to_string(),
            revised: revised.type_name().to_string(),
        });
        self.record(ObjectModification::updated(
            path.clone(),
            Some(ModifiedValue::from_object(original)),
            Some(ModifiedValue::from_object(revised)),
        ));
    }

    fn compare_streams(&mut self, path: &ObjectPath, original: &PdfDict, revised: &PdfDict) {
        let stream_path = path.to_stream();
        match compare_raw_streams(original.stream(), revised.stream()) {
            Ok(StreamDifference::Unchanged) => {}
            Ok(StreamDifference::Added) => {
                self.record(ObjectModification::created(stream_path, None));
            }
            Ok(StreamDifference::Removed) => {
                self.record(ObjectModification::deleted(stream_path, None));
            }
            Ok(StreamDifference::Changed) => {
                self.record(ObjectModification::updated(stream_path, None, None));
            }
            Err(e) => self.warn(ComparisonWarning::StreamUnreadable {
                path: stream_path,
                reason: e.to_string(),
            }),
        }
    }
}


#[cfg(test)]
mod property_tests {
    use std::collections::BTreeMap;

    use docmod_types::{Revision, Slot};
    use proptest::prelude::*;

    use super::*;
    use crate::modification::ModificationKind;

    fn scalar() -> impl Strategy<Value = PdfObject> {
        prop_oneof![
            (-50i64..50).prop_map(PdfObject::from),
            (-200i32..200).prop_map(|v| PdfObject::from(f64::from(v) / 4.0)),
            any::<bool>().prop_map(PdfObject::from),
            "[A-C]".prop_map(PdfObject::name),
            "[a-c]{0,3}".prop_map(|s| PdfObject::string(s.into_bytes())),
        ]
    }

    fn object() -> impl Strategy<Value = PdfObject> {
        scalar().prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(|items| {
                    PdfObject::from(items.into_iter().map(Slot::Direct).collect::<PdfArray>())
                }),
                prop::collection::btree_map("[A-D]", inner, 0..4).prop_map(|entries| {
                    let mut dict = PdfDict::new();
                    for (key, value) in entries {
                        dict.insert(key, value);
                    }
                    PdfObject::from(dict)
                }),
            ]
        })
    }

    const POOL_SIZE: u64 = 3;

    fn element() -> impl Strategy<Value = Slot> {
        prop_oneof![
            (1..=POOL_SIZE).prop_map(|number| Slot::Reference(ObjectNumber::new(number))),
            object().prop_map(Slot::Direct),
        ]
    }

    fn dict_of(entries: BTreeMap<String, Slot>) -> PdfDict {
        let mut dict = PdfDict::new();
        for (key, slot) in entries {
            match slot {
                Slot::Direct(value) => dict.insert(key, value),
                Slot::Reference(number) => dict.insert_reference(key, number),
            };
        }
        dict
    }

    fn revision_of(objects: Vec<PdfObject>) -> Revision {
        let mut graph = Revision::new();
        for (number, obj) in (1..).zip(objects) {
            graph.insert(ObjectNumber::new(number), obj).unwrap();
        }
        graph
    }

    /// Objects #1..#3 without references of their own.
    fn pool() -> impl Strategy<Value = Revision> {
        prop::collection::vec(object(), POOL_SIZE as usize).prop_map(revision_of)
    }

    /// Objects #1..#3 that may reference each other, cycles included.
    fn linked_pool() -> impl Strategy<Value = Revision> {
        prop::collection::vec(prop::collection::btree_map("[A-D]", element(), 0..4), POOL_SIZE as usize)
            .prop_map(|dicts| revision_of(dicts.into_iter().map(|d| PdfObject::from(dict_of(d))).collect()))
    }

    /// Root whose entries point into the pool, directly or from arrays. Its
    /// keys never occur inside pool objects, so each entry is its own key
    /// context for the visited guard.
    fn referencing_root() -> impl Strategy<Value = PdfObject> {
        let entry = prop_oneof![
            element(),
            prop::collection::vec(element(), 0..5)
                .prop_map(|slots| Slot::Direct(PdfObject::from(slots.into_iter().collect::<PdfArray>()))),
        ];
        prop::collection::btree_map("K[0-3]", entry, 0..4).prop_map(|entries| PdfObject::from(dict_of(entries)))
    }

    fn kinds(report: &ComparisonReport<'_>) -> BTreeMap<String, ModificationKind> {
        report
            .modifications
            .iter()
            .map(|m| (m.path().to_string(), m.kind()))
            .collect()
    }

    fn swapped(kind: ModificationKind) -> ModificationKind {
        match kind {
            ModificationKind::Created => ModificationKind::Deleted,
            ModificationKind::Deleted => ModificationKind::Created,
            ModificationKind::Updated => ModificationKind::Updated,
        }
    }

    proptest! {
        #[test]
        fn comparing_with_itself_is_empty(obj in object()) {
            let graph = Revision::new();
            let report = RevisionComparator::default()
                .compare(RootedObject::new(&graph, &obj), RootedObject::new(&graph, &obj));
            prop_assert!(report.is_empty());
            prop_assert!(!report.has_warnings());
        }

        #[test]
        fn swapping_sides_swaps_created_and_deleted(a in object(), b in object()) {
            let graph = Revision::new();
            let comparator = RevisionComparator::default();
            let forward = comparator.compare(RootedObject::new(&graph, &a), RootedObject::new(&graph, &b));
            let backward = comparator.compare(RootedObject::new(&graph, &b), RootedObject::new(&graph, &a));

            let expected: BTreeMap<_, _> = kinds(&forward)
                .into_iter()
                .map(|(path, kind)| (path, swapped(kind)))
                .collect();
            prop_assert_eq!(expected, kinds(&backward));
        }

        #[test]
        fn comparing_linked_objects_with_themselves_is_empty(graph in linked_pool(), root in referencing_root()) {
            let report = RevisionComparator::default()
                .compare(RootedObject::new(&graph, &root), RootedObject::new(&graph, &root));
            prop_assert!(report.is_empty());
        }

        #[test]
        fn swapping_sides_with_shared_references(
            graph in pool(),
            a in referencing_root(),
            b in referencing_root(),
        ) {
            let comparator = RevisionComparator::default();
            let forward = comparator.compare(RootedObject::new(&graph, &a), RootedObject::new(&graph, &b));
            let backward = comparator.compare(RootedObject::new(&graph, &b), RootedObject::new(&graph, &a));

            let expected: BTreeMap<_, _> = kinds(&forward)
                .into_iter()
                .map(|(path, kind)| (path, swapped(kind)))
                .collect();
            prop_assert_eq!(expected, kinds(&backward));
        }
    }
}
