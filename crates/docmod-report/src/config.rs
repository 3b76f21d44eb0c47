//! Category rules and their TOML form.
//!
//! The default rule set gives the updates a signed document is expected to
//! receive their own buckets and leaves the rest to the fallback bucket.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Bucket for modifications no rule claims.
pub const FALLBACK_BUCKET: &str = "undefined";

/// Bucket for document security store and timestamp additions.
pub const EXTENSION_BUCKET: &str = "extension";

/// Bucket for form fields and signature dictionaries.
pub const SIGNATURE_OR_FORM_FILL_BUCKET: &str = "signature-or-form-fill";

/// Bucket for annotation changes.
pub const ANNOTATION_BUCKET: &str = "annotation";

/// A named bucket and the path keys that select it.
///
/// A modification matches when any of `keys` appears as a key segment of
/// its path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub bucket: String,
    pub keys: Vec<String>,
}

impl CategoryRule {
    pub fn new<I, S>(bucket: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bucket: bucket.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// Configuration for the rule-based categorizer.
///
/// Rules are tried in order and the first match wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizerConfig {
    pub rules: Vec<CategoryRule>,
    pub fallback_bucket: String,
}

impl Default for CategorizerConfig {
    /// Incremental-update vocabulary of signed documents: validation data
    /// and timestamps, form filling and signing, annotations.
    fn default() -> Self {
        Self {
            rules: vec![
                CategoryRule::new(EXTENSION_BUCKET, ["DSS", "VRI", "DocTimeStamp"]),
                CategoryRule::new(
                    SIGNATURE_OR_FORM_FILL_BUCKET,
                    ["AcroForm", "Fields", "V", "AP", "Sig"],
                ),
                CategoryRule::new(ANNOTATION_BUCKET, ["Annots"]),
            ],
            fallback_bucket: FALLBACK_BUCKET.to_string(),
        }
    }
}

impl CategorizerConfig {
    /// A configuration that sends everything to the fallback bucket.
    pub fn fallback_only() -> Self {
        Self {
            rules: Vec::new(),
            ..Default::default()
        }
    }

    /// Parse and validate a configuration from TOML.
    ///
    /// ```
    /// use docmod_report::CategorizerConfig;
    ///
    /// let config = CategorizerConfig::from_toml_str(
    ///     r#"
    ///     fallback_bucket = "other"
    ///
    ///     [[rules]]
    ///     bucket = "pages"
    ///     keys = ["Pages", "Kids"]
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.rules.len(), 1);
    /// assert_eq!(config.fallback_bucket, "other");
    /// ```
    pub fn from_toml_str(input: &str) -> ReportResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| ReportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ReportResult<String> {
        toml::to_string(self).map_err(|e| ReportError::Config(e.to_string()))
    }

    /// Bucket names in rule order, followed by the fallback bucket.
    pub fn bucket_names(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .map(|r| r.bucket.as_str())
            .chain(std::iter::once(self.fallback_bucket.as_str()))
    }

    /// Check that every bucket is named, unique and selectable.
    pub fn validate(&self) -> ReportResult<()> {
        let mut seen = HashSet::new();
        for name in self.bucket_names() {
            if name.trim().is_empty() {
                return Err(ReportError::InvalidRules("bucket name must not be empty".into()));
            }
            if !seen.insert(name) {
                return Err(ReportError::InvalidRules(format!("duplicate bucket '{name}'")));
            }
        }
        for rule in &self.rules {
            if rule.keys.is_empty() {
                return Err(ReportError::InvalidRules(format!(
                    "rule for bucket '{}' has no keys",
                    rule.bucket
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_are_valid() {
        let config = CategorizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.bucket_names().collect::<Vec<_>>(),
            vec!["extension", "signature-or-form-fill", "annotation", "undefined"]
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = CategorizerConfig::from_toml_str("").unwrap();
        assert_eq!(config, CategorizerConfig::default());
    }

    #[test]
    fn toml_roundtrip() {
        let config = CategorizerConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(CategorizerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn duplicate_bucket_is_rejected() {
        let err = CategorizerConfig::from_toml_str(
            r#"
            [[rules]]
            bucket = "a"
            keys = ["X"]

            [[rules]]
            bucket = "a"
            keys = ["Y"]
            "#,
        )
        .unwrap_err();
        assert_eq!(err, ReportError::InvalidRules("duplicate bucket 'a'".into()));
    }

    #[test]
    fn fallback_may_not_shadow_a_rule() {
        let config = CategorizerConfig {
            rules: vec![CategoryRule::new("undefined", ["X"])],
            fallback_bucket: FALLBACK_BUCKET.into(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_names_and_keys_are_rejected() {
        let blank = CategorizerConfig {
            rules: Vec::new(),
            fallback_bucket: "  ".into(),
        };
        assert!(blank.validate().is_err());

        let keyless = CategorizerConfig {
            rules: vec![CategoryRule::new("pages", Vec::<String>::new())],
            ..Default::default()
        };
        assert!(matches!(keyless.validate(), Err(ReportError::InvalidRules(_))));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = CategorizerConfig::from_toml_str("rules = 3").unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }
}
