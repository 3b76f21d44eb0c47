//! Comparator settings.
//!
//! Loaded from TOML with `#[serde(default)]`, so a partial file only
//! overrides the fields it names.

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Default limit on path length before a branch is abandoned.
pub const DEFAULT_MAX_DEEPNESS: usize = 500;

/// Configuration of the revision comparator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorConfig {
    /// Maximum number of path segments before a branch is abandoned.
    ///
    /// Deep nesting in hostile documents would otherwise exhaust the stack.
    /// `0` disables the comparison entirely without emitting a warning.
    pub max_deepness: usize,
    /// Whether an integer is promoted to a real before comparing it against
    /// a real. When enabled `612` and `612.0` compare equal.
    pub lax_numeric_comparison: bool,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            max_deepness: DEFAULT_MAX_DEEPNESS,
            lax_numeric_comparison: true,
        }
    }
}

impl ComparatorConfig {
    /// Parse a configuration from TOML. Missing fields take their defaults.
    ///
    /// ```
    /// use docmod_diff::ComparatorConfig;
    ///
    /// let config = ComparatorConfig::from_toml_str("max_deepness = 64").unwrap();
    /// assert_eq!(config.max_deepness, 64);
    /// assert!(config.lax_numeric_comparison);
    /// ```
    pub fn from_toml_str(input: &str) -> DiffResult<Self> {
        toml::from_str(input).map_err(|e| DiffError::Config(e.to_string()))
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> DiffResult<String> {
        toml::to_string(self).map_err(|e| DiffError::Config(e.to_string()))
    }

    /// Returns `true` when `max_deepness` is zero.
    pub fn is_disabled(&self) -> bool {
        self.max_deepness == 0
    }
}
