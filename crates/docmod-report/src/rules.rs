//! Rule-driven categorizer.

use docmod_diff::{ModificationSet, ObjectModification};
use tracing::debug;

use crate::categorizer::{CategorizedModifications, ModificationCategorizer};
use crate::config::CategorizerConfig;
use crate::error::ReportResult;

/// Categorizer driven by [`CategorizerConfig`] rules.
///
/// Each modification goes to the first rule whose keys appear in its path,
/// or to the fallback bucket when no rule matches. The default instance uses
/// [`CategorizerConfig::default`].
#[derive(Clone, Debug, Default)]
pub struct RuleCategorizer {
    config: CategorizerConfig,
}

impl RuleCategorizer {
    /// Create a categorizer after validating `config`.
    pub fn new(config: CategorizerConfig) -> ReportResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CategorizerConfig {
        &self.config
    }

    /// Bucket name for a single modification.
    pub fn bucket_for(&self, modification: &ObjectModification<'_>) -> &str {
        let path = modification.path();
        self.config
            .rules
            .iter()
            .find(|rule| rule.keys.iter().any(|key| path.contains_key(key)))
            .map(|rule| rule.bucket.as_str())
            .unwrap_or(self.config.fallback_bucket.as_str())
    }
}

impl ModificationCategorizer for RuleCategorizer {
    fn name(&self) -> &str {
        "rules"
    }

    fn categorize<'a>(&self, modifications: &ModificationSet<'a>) -> CategorizedModifications<'a> {
        let mut categories = CategorizedModifications::with_buckets(self.config.bucket_names());
        for modification in modifications {
            let bucket = self.bucket_for(modification);
            debug!(path = %modification.path(), bucket, "modification categorized");
            categories.push(bucket, modification.clone());
        }
        categories
    }
}

#[cfg(test)]
mod tests {
    use docmod_diff::ObjectPath;

    use super::*;
    use crate::config::CategoryRule;

    fn updated(path: ObjectPath) -> ObjectModification<'static> {
        ObjectModification::updated(path, None, None)
    }

    fn catalog() -> ObjectPath {
        ObjectPath::labelled("Catalog")
    }

    #[test]
    fn default_rules_bucket_by_path_keys() {
        let categorizer = RuleCategorizer::default();
        let cases = [
            (catalog().enter_key("DSS").enter_key("Certs"), "extension"),
            (catalog().enter_key("AcroForm").enter_key("Fields").enter_index(0), "signature-or-form-fill"),
            (
                catalog().enter_key("Pages").enter_key("Kids").enter_index(0).enter_key("Annots").enter_index(2),
                "annotation",
            ),
            (catalog().enter_key("Pages").enter_key("Count"), "undefined"),
        ];
        for (path, bucket) in cases {
            assert_eq!(categorizer.bucket_for(&updated(path)), bucket);
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        let categorizer = RuleCategorizer::default();
        // A widget appearance inside the annotation array.
        let path = catalog()
            .enter_key("Pages")
            .enter_key("Kids")
            .enter_index(0)
            .enter_key("Annots")
            .enter_index(0)
            .enter_key("AP");
        assert_eq!(categorizer.bucket_for(&updated(path)), "signature-or-form-fill");
    }

    #[test]
    fn stream_paths_use_their_keys() {
        let categorizer = RuleCategorizer::default();
        let path = catalog().enter_key("DSS").enter_key("OCSPs").enter_index(0).to_stream();
        assert_eq!(categorizer.bucket_for(&updated(path)), "extension");
    }

    #[test]
    fn categorize_preserves_order_and_count() {
        let mut set = ModificationSet::new();
        set.insert(updated(catalog().enter_key("Count")));
        set.insert(updated(catalog().enter_key("DSS")));
        set.insert(updated(catalog().enter_key("Version")));

        let categories = RuleCategorizer::default().categorize(&set);
        assert_eq!(categories.len(), set.len());
        let undefined: Vec<_> = categories
            .bucket("undefined")
            .iter()
            .map(|m| m.path().to_string())
            .collect();
        assert_eq!(undefined, vec!["Catalog/Count", "Catalog/Version"]);
        assert_eq!(categories.bucket("extension").len(), 1);
        assert!(categories.bucket("annotation").is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = CategorizerConfig {
            rules: vec![CategoryRule::new("", ["X"])],
            ..Default::default()
        };
        assert!(RuleCategorizer::new(config).is_err());
    }
}
