use serde::Serialize;
use serde_json::Value;

use crate::domain::path::PropertyPath;
use crate::domain::rules::ComparisonConfig;

/// One detected discrepancy between the two compared object graphs.
///
/// Produced by the diff engine and immutable from then on — the filter never
/// edits a difference, it only drops whole entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    pub path: PropertyPath,
    pub source: Value,
    pub target: Value,
    pub description: String,
}

impl Difference {
    pub fn new(path: PropertyPath, source: Value, target: Value) -> Self {
        let description = format!("{}: {} != {}", path, source, target);
        Self {
            path,
            source,
            target,
            description,
        }
    }

    pub fn with_description(
        path: PropertyPath,
        source: Value,
        target: Value,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path,
            source,
            target,
            description: description.into(),
        }
    }
}

/// Output of one pairwise structural comparison: the configuration the engine
/// ran with plus the ordered difference list (raw before filtering, reduced
/// after).
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub config: ComparisonConfig,
    pub differences: Vec<Difference>,
}

impl ComparisonResult {
    pub fn new(config: ComparisonConfig, differences: Vec<Difference>) -> Self {
        Self {
            config,
            differences,
        }
    }

    pub fn empty(config: ComparisonConfig) -> Self {
        Self {
            config,
            differences: Vec::new(),
        }
    }

    pub fn are_equal(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Reduced view of a filtered comparison, suitable for reports.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DifferenceSummary {
    /// Differences remaining after both filter stages.
    pub total_differences: usize,
    /// Suppressed by exact ignore rules.
    pub suppressed_exact: usize,
    /// Suppressed by smart ignore rules.
    pub suppressed_smart: usize,
    pub are_equal: bool,
}

impl DifferenceSummary {
    pub fn new(total_differences: usize, suppressed_exact: usize, suppressed_smart: usize) -> Self {
        Self {
            total_differences,
            suppressed_exact,
            suppressed_smart,
            are_equal: total_differences == 0,
        }
    }

    pub fn suppressed(&self) -> usize {
        self.suppressed_exact + self.suppressed_smart
    }
}
