use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::domain::difference::ComparisonResult;
use crate::domain::pair::PairInput;
use crate::domain::report::RunReport;
use crate::domain::rules::ComparisonConfig;
use crate::domain::text_diff::RawTextDifference;

/// Port: structural diff algorithm (implemented by JsonDiffEngine).
///
/// The engine is a black box to the core: it receives two object graphs and
/// the configuration (including structurally excluded paths) and returns the
/// raw, unfiltered difference list.
pub trait DiffEngine: Send + Sync {
    fn diff(&self, source: &Value, target: &Value, config: &ComparisonConfig)
        -> Result<ComparisonResult>;
}

/// Port: line-level text diff fallback for non-success or unparseable bodies
/// (implemented by PlainLineDiffer).
pub trait LineDiffer: Send + Sync {
    fn line_diff(&self, source: &str, target: &str) -> Vec<RawTextDifference>;
}

/// Port: pair discovery and loading (implemented by FsPairProvider).
#[async_trait]
pub trait PairProvider: Send + Sync {
    /// Enumerate and load all pairs, in a stable order. Per-side failures are
    /// recorded on the `PairInput`, not returned as errors — only discovery
    /// itself (e.g. an unreadable root folder) fails the call.
    async fn discover(&self) -> Result<Vec<PairInput>>;
}

/// Port: report formatting (implemented by JsonWriter, TextWriter).
pub trait ReportWriter: Send + Sync {
    /// Serializes the run report to a string (JSON, plain text, ...).
    fn format(&self, report: &RunReport) -> Result<String>;
    /// Extension of the produced file (e.g. "json", "txt").
    fn extension(&self) -> &'static str;
}
