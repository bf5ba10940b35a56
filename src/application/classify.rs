use crate::domain::outcome::PairOutcome;
use crate::domain::text_diff::RawTextDifference;

/// Inputs the classifier decides on. Statuses are absent for pure file and
/// folder comparisons.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierInput<'a> {
    pub source_status: Option<u16>,
    pub target_status: Option<u16>,
    /// Structural differences remaining after both filter stages.
    pub filtered_count: usize,
    /// A side failed hard (retrieval, deserialization or engine error) — not
    /// merely a non-success status code.
    pub has_error: bool,
    pub text_differences: &'a [RawTextDifference],
}

/// Assign the outcome category for one compared pair.
///
/// Decision ladder, first match wins:
/// 1. hard error on either side,
/// 2. statuses present and unequal,
/// 3. statuses equal and non-success on both sides — classified by text-diff
///    presence (structural comparison is meaningless for error bodies),
/// 4. zero structural differences,
/// 5. anything else has differences.
///
/// Status-code mismatch deliberately outranks structural equality: a 200/500
/// pair is never "equal" even when both bodies serialize identically. With no
/// statuses the classification is purely structural. The ladder is total, so
/// no input combination falls through.
pub fn classify(input: ClassifierInput<'_>) -> PairOutcome {
    if input.has_error {
        return PairOutcome::SideErrored;
    }

    if let (Some(source), Some(target)) = (input.source_status, input.target_status) {
        if source != target {
            return PairOutcome::StatusCodeMismatch;
        }
        if !is_success(source) {
            return if input.text_differences.is_empty() {
                PairOutcome::MatchingErrors
            } else {
                PairOutcome::DifferencesFound
            };
        }
    }

    if input.filtered_count == 0 {
        PairOutcome::Equal
    } else {
        PairOutcome::DifferencesFound
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
