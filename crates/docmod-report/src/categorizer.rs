//! Categorizer strategy and its bucketed output.

use docmod_diff::{ModificationSet, ObjectModification};
use indexmap::IndexMap;

// ---------------------------------------------------------------------------
// CategorizedModifications
// ---------------------------------------------------------------------------

/// Modifications partitioned into named buckets.
///
/// Buckets keep the order in which they were declared, and each bucket keeps
/// the order in which the comparator found its modifications.
#[derive(Clone, Debug, Default)]
pub struct CategorizedModifications<'a> {
    buckets: IndexMap<String, Vec<ObjectModification<'a>>>,
}

impl<'a> CategorizedModifications<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with the given buckets present and empty.
    pub fn with_buckets<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            buckets: names.into_iter().map(|n| (n.into(), Vec::new())).collect(),
        }
    }

    /// Append a modification to `bucket`, creating the bucket if needed.
    pub fn push(&mut self, bucket: &str, modification: ObjectModification<'a>) {
        match self.buckets.get_mut(bucket) {
            Some(records) => records.push(modification),
            None => {
                self.buckets.insert(bucket.to_string(), vec![modification]);
            }
        }
    }

    /// Modifications in `bucket`; empty if the bucket does not exist.
    pub fn bucket(&self, name: &str) -> &[ObjectModification<'a>] {
        self.buckets.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn bucket_names(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Iterate `(bucket, modifications)` pairs in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ObjectModification<'a>])> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Name of the bucket holding the record at `rendered_path`.
    pub fn bucket_of(&self, rendered_path: &str) -> Option<&str> {
        self.buckets
            .iter()
            .find(|(_, records)| records.iter().any(|m| m.path().to_string() == rendered_path))
            .map(|(name, _)| name.as_str())
    }

    /// Total number of modifications across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }
}

// ---------------------------------------------------------------------------
// ModificationCategorizer trait
// ---------------------------------------------------------------------------

/// Policy that partitions a modification set into named buckets.
///
/// The categorizer receives the complete, deduplicated set in the order the
/// comparator produced it. The trait is object-safe and `Send + Sync` so a
/// categorizer can be stored as a `Box<dyn ModificationCategorizer>`.
pub trait ModificationCategorizer: Send + Sync {
    /// Human-readable name of this categorizer (e.g., "rules").
    fn name(&self) -> &str;

    /// Assign every modification in `modifications` to a bucket.
    fn categorize<'a>(&self, modifications: &ModificationSet<'a>) -> CategorizedModifications<'a>;
}

#[cfg(test)]
mod tests {
    use docmod_diff::ObjectPath;

    use super::*;

    fn created(key: &str) -> ObjectModification<'static> {
        ObjectModification::created(ObjectPath::root().enter_key(key), None)
    }

    #[test]
    fn seeded_buckets_are_present_and_empty() {
        let categories = CategorizedModifications::with_buckets(["a", "b"]);
        assert_eq!(categories.bucket_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(categories.is_empty());
        assert!(categories.bucket("missing").is_empty());
    }

    #[test]
    fn push_keeps_order_and_creates_buckets() {
        let mut categories = CategorizedModifications::with_buckets(["a"]);
        categories.push("b", created("X"));
        categories.push("a", created("Y"));
        categories.push("a", created("Z"));

        assert_eq!(categories.len(), 3);
        assert_eq!(categories.bucket_names().collect::<Vec<_>>(), vec!["a", "b"]);
        let a: Vec<_> = categories.bucket("a").iter().map(|m| m.path().to_string()).collect();
        assert_eq!(a, vec!["Y", "Z"]);
        assert_eq!(categories.bucket_of("X"), Some("b"));
        assert_eq!(categories.bucket_of("W"), None);
    }
}
