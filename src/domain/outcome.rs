use serde::Serialize;

/// Classification assigned to one compared pair.
///
/// Closed enumeration owned by the classifier (`application::classify`) —
/// every input combination maps to exactly one variant, so consumers can
/// match exhaustively without a catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairOutcome {
    /// Successful comparison, no differences left after filtering.
    Equal,
    /// Both sides returned the same non-success status and identical bodies.
    MatchingErrors,
    /// Differences remain after filtering (structural or text-level).
    DifferencesFound,
    /// A side failed hard during retrieval, deserialization or comparison.
    SideErrored,
    /// Status codes were present and unequal.
    StatusCodeMismatch,
}

impl PairOutcome {
    /// Stable key used in report metadata counters.
    pub fn as_str(&self) -> &'static str {
        match self {
            PairOutcome::Equal => "equal",
            PairOutcome::MatchingErrors => "matching_errors",
            PairOutcome::DifferencesFound => "differences_found",
            PairOutcome::SideErrored => "side_errored",
            PairOutcome::StatusCodeMismatch => "status_code_mismatch",
        }
    }
}

impl std::fmt::Display for PairOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
