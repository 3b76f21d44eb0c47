//! Locations of objects inside a revision.
//!
//! An [`ObjectPath`] is a value: entering a key or an index returns a new
//! path, so sibling branches of a traversal never see each other's segments.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label seeded at the start of catalog-rooted comparisons.
pub const CATALOG_LABEL: &str = "Catalog";

/// Separator between key segments in the rendered path.
pub const PATH_SEPARATOR: char = '/';

/// Suffix appended when a path denotes a dictionary's raw stream.
pub const STREAM_SUFFIX: &str = "::stream";

/// One step from a container to one of its children.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Path from the comparison root to an object.
///
/// Two paths are equal when their segments and stream marker are equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectPath {
    segments: Vec<PathSegment>,
    stream: bool,
}

impl ObjectPath {
    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    /// A path starting with a single label, e.g. [`CATALOG_LABEL`].
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(label.into())],
            stream: false,
        }
    }

    /// Copy of this path with `key` appended.
    pub fn enter_key(&self, key: &str) -> Self {
        self.child(PathSegment::Key(key.to_string()))
    }

    /// Copy of this path with `index` appended.
    pub fn enter_index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    /// Copy of this path denoting the raw stream of the dictionary it names.
    pub fn to_stream(&self) -> Self {
        Self {
            segments: self.segments.clone(),
            stream: true,
        }
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self {
            segments,
            stream: false,
        }
    }

    /// Number of segments. This is what the depth limit counts.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_stream(&self) -> bool {
        self.stream
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Key segments in order, skipping indices.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    /// Returns `true` if any key segment equals `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }
}

/// Renders as `Catalog/Pages/Kids[0]/Contents::stream`.
impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => {
                    if !first {
                        write!(f, "{PATH_SEPARATOR}")?;
                    }
                    write!(f, "{key}")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
            first = false;
        }
        if self.stream {
            write!(f, "{STREAM_SUFFIX}")?;
        }
        Ok(())
    }
}
