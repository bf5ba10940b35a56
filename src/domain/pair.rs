use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::domain::difference::{ComparisonResult, DifferenceSummary};
use crate::domain::outcome::PairOutcome;
use crate::domain::text_diff::RawTextDifference;

// ─── Pipeline input ───────────────────────────────────────────────────────────

/// Failure that occurred while retrieving or deserializing one side.
#[derive(Debug, Clone, Serialize)]
pub struct SideError {
    pub message: String,
    /// Coarse error category used for metadata counts, e.g.
    /// `"DeserializationError"`, `"MissingFile"`, `"ComparisonError"`.
    pub kind: String,
}

impl SideError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: kind.into(),
        }
    }
}

/// One side of a pair as handed to the compare pipeline by the orchestration
/// layer (folder walker, HTTP replayer, ...).
#[derive(Debug, Clone, Default)]
pub struct SideInput {
    /// HTTP status when the side came from a request; `None` for files.
    pub status: Option<u16>,
    /// Parsed body, when deserialization succeeded upstream.
    pub body: Option<Value>,
    /// Raw text body, used for the line-diff fallback and for late parsing.
    pub raw: Option<String>,
    pub error: Option<SideError>,
}

impl SideInput {
    pub fn parsed(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn text(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    pub fn failed(error: SideError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// One compared unit before processing: a file pair, folder entry pair, or
/// request/response pair from two sources.
#[derive(Debug, Clone)]
pub struct PairInput {
    /// Display name. May collide across folders — `relative_path` is the
    /// stable identity when present.
    pub name: String,
    pub relative_path: Option<String>,
    pub source_path: Option<PathBuf>,
    pub target_path: Option<PathBuf>,
    pub source: SideInput,
    pub target: SideInput,
}

impl PairInput {
    pub fn new(name: impl Into<String>, source: SideInput, target: SideInput) -> Self {
        Self {
            name: name.into(),
            relative_path: None,
            source_path: None,
            target_path: None,
            source,
            target,
        }
    }
}

// ─── Pipeline output ──────────────────────────────────────────────────────────

/// Full outcome of one compared pair.
///
/// Built stage by stage by the compare pipeline (deserialize → compare →
/// filter → classify); each stage fills in its fields or records its failure.
/// Never mutated after the pair finishes.
#[derive(Debug, Clone, Serialize)]
pub struct PairResult {
    pub name: String,
    pub relative_path: Option<String>,
    pub source_path: Option<PathBuf>,
    pub target_path: Option<PathBuf>,
    pub source_status: Option<u16>,
    pub target_status: Option<u16>,
    pub comparison: Option<ComparisonResult>,
    pub summary: Option<DifferenceSummary>,
    pub outcome: PairOutcome,
    pub text_differences: Vec<RawTextDifference>,
    pub error_message: Option<String>,
    pub error_type: Option<String>,
}

impl PairResult {
    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    /// Equality is never reported for an errored pair — it cannot be
    /// established without a successful comparison.
    pub fn are_equal(&self) -> bool {
        !self.has_error() && self.summary.map(|s| s.are_equal).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_result() -> PairResult {
        PairResult {
            name: "pair".into(),
            relative_path: None,
            source_path: None,
            target_path: None,
            source_status: None,
            target_status: None,
            comparison: None,
            summary: Some(DifferenceSummary::new(0, 0, 0)),
            outcome: PairOutcome::Equal,
            text_differences: vec![],
            error_message: None,
            error_type: None,
        }
    }

    #[test]
    fn equal_requires_summary_and_no_error() {
        assert!(base_result().are_equal());

        let mut no_summary = base_result();
        no_summary.summary = None;
        assert!(!no_summary.are_equal());
    }

    #[test]
    fn error_overrides_equal_summary() {
        let mut errored = base_result();
        errored.error_message = Some("engine blew up".into());
        assert!(errored.has_error());
        assert!(!errored.are_equal());
    }
}
