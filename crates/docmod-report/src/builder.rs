//! Report assembly: compare two revisions, then bucket the result with the
//! configured categorizer.

use std::time::{Duration, Instant};

use docmod_diff::{ComparisonReport, ComparisonWarning, ModificationSet, RevisionComparator};
use docmod_types::ObjectGraph;
use tracing::debug;

use crate::categorizer::{CategorizedModifications, ModificationCategorizer};
use crate::error::ReportResult;
use crate::rules::RuleCategorizer;

// ---------------------------------------------------------------------------
// ModificationReport
// ---------------------------------------------------------------------------

/// A comparison result together with its categorization.
#[derive(Clone, Debug)]
pub struct ModificationReport<'a> {
    /// Modifications and warnings as produced by the comparator.
    pub comparison: ComparisonReport<'a>,
    /// The same modifications, bucketed by the categorizer.
    pub categories: CategorizedModifications<'a>,
    /// Name of the categorizer that produced `categories`.
    pub categorizer: String,
    /// Wall-clock time spent producing the report.
    pub elapsed: Duration,
}

impl<'a> ModificationReport<'a> {
    /// Returns `true` if the revisions did not differ.
    pub fn is_empty(&self) -> bool {
        self.comparison.is_empty()
    }

    /// Returns `false` if any branch was cut at the depth limit.
    pub fn is_complete(&self) -> bool {
        self.comparison.is_complete()
    }

    pub fn modifications(&self) -> &ModificationSet<'a> {
        &self.comparison.modifications
    }

    pub fn warnings(&self) -> &[ComparisonWarning] {
        &self.comparison.warnings
    }
}

// ---------------------------------------------------------------------------
// ModificationReportBuilder
// ---------------------------------------------------------------------------

/// Hands a comparison result to an injected categorizer.
///
/// The builder never inspects the modifications itself; what counts as an
/// acceptable change is entirely up to the categorizer and its caller.
pub struct ModificationReportBuilder {
    categorizer: Box<dyn ModificationCategorizer>,
}

impl ModificationReportBuilder {
    pub fn new(categorizer: Box<dyn ModificationCategorizer>) -> Self {
        Self { categorizer }
    }

    /// Builder using [`RuleCategorizer`] with its default rules.
    pub fn with_default_rules() -> Self {
        Self::new(Box::new(RuleCategorizer::default()))
    }

    pub fn categorizer_name(&self) -> &str {
        self.categorizer.name()
    }

    /// Categorize an existing comparison result.
    pub fn build<'a>(&self, comparison: ComparisonReport<'a>) -> ModificationReport<'a> {
        let start = Instant::now();
        self.finish(comparison, start)
    }

    /// Compare the catalogs of two revisions and categorize the result.
    pub fn run<'a>(
        &self,
        comparator: &RevisionComparator,
        original: &'a dyn ObjectGraph,
        revised: &'a dyn ObjectGraph,
    ) -> ReportResult<ModificationReport<'a>> {
        let start = Instant::now();
        let comparison = comparator.compare_revisions(original, revised)?;
        Ok(self.finish(comparison, start))
    }

    fn finish<'a>(&self, comparison: ComparisonReport<'a>, start: Instant) -> ModificationReport<'a> {
        let categories = self.categorizer.categorize(&comparison.modifications);
        let elapsed = start.elapsed();
        debug!(
            categorizer = self.categorizer.name(),
            modifications = comparison.modifications.len(),
            buckets = categories.bucket_names().count(),
            ?elapsed,
            "modification report built"
        );
        ModificationReport {
            comparison,
            categories,
            categorizer: self.categorizer.name().to_string(),
            elapsed,
        }
    }
}

impl Default for ModificationReportBuilder {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
