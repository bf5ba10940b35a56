use crate::domain::pair::PairResult;
use crate::domain::report::RunReport;

/// Folds per-pair results into a [`RunReport`].
///
/// Single left-to-right fold, no reordering: `pairs` keeps input order so the
/// report is stable and reproducible across runs on the same inputs.
/// `all_equal` is monotonic — once false it never resets. Metadata counts are
/// order-independent.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    report: RunReport,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {
            report: RunReport::new(),
        }
    }

    pub fn push(&mut self, pair: PairResult) {
        self.report.total_pairs += 1;
        if !pair.are_equal() {
            self.report.all_equal = false;
        }

        let outcome_key = format!("outcome.{}", pair.outcome);
        *self.report.metadata.entry(outcome_key).or_insert(0) += 1;

        if let Some(error_type) = &pair.error_type {
            let error_key = format!("error.{}", error_type);
            *self.report.metadata.entry(error_key).or_insert(0) += 1;
        }

        self.report.pairs.push(pair);
    }

    pub fn finish(self) -> RunReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::difference::DifferenceSummary;
    use crate::domain::outcome::PairOutcome;

    fn pair(name: &str, outcome: PairOutcome) -> PairResult {
        let (summary, error_message, error_type) = match outcome {
            PairOutcome::SideErrored => (
                None,
                Some("target side failed to deserialize".to_string()),
                Some("DeserializationError".to_string()),
            ),
            PairOutcome::Equal => (Some(DifferenceSummary::new(0, 0, 0)), None, None),
            _ => (Some(DifferenceSummary::new(2, 0, 0)), None, None),
        };
        PairResult {
            name: name.into(),
            relative_path: None,
            source_path: None,
            target_path: None,
            source_status: None,
            target_status: None,
            comparison: None,
            summary,
            outcome,
            text_differences: vec![],
            error_message,
            error_type,
        }
    }

    #[test]
    fn all_equal_iff_every_pair_equal() {
        let mut agg = ResultAggregator::new();
        agg.push(pair("a", PairOutcome::Equal));
        agg.push(pair("b", PairOutcome::Equal));
        let report = agg.finish();
        assert!(report.all_equal);
        assert_eq!(report.total_pairs, 2);
    }

    #[test]
    fn equal_equal_error_scenario() {
        let mut agg = ResultAggregator::new();
        agg.push(pair("a", PairOutcome::Equal));
        agg.push(pair("b", PairOutcome::Equal));
        agg.push(pair("c", PairOutcome::SideErrored));
        let report = agg.finish();

        assert_eq!(report.total_pairs, 3);
        assert!(!report.all_equal);
        assert_eq!(report.metadata["outcome.equal"], 2);
        assert_eq!(report.metadata["outcome.side_errored"], 1);
        assert_eq!(report.metadata["error.DeserializationError"], 1);
    }

    #[test]
    fn all_equal_never_resets() {
        let mut agg = ResultAggregator::new();
        agg.push(pair("a", PairOutcome::DifferencesFound));
        agg.push(pair("b", PairOutcome::Equal));
        assert!(!agg.finish().all_equal);
    }

    #[test]
    fn errored_pair_is_never_equal_even_with_equal_summary() {
        let mut errored = pair("x", PairOutcome::SideErrored);
        errored.summary = Some(DifferenceSummary::new(0, 0, 0));

        let mut agg = ResultAggregator::new();
        agg.push(errored);
        let report = agg.finish();
        assert!(!report.all_equal);
        assert!(!report.pairs[0].are_equal());
    }

    #[test]
    fn input_order_is_preserved() {
        let mut agg = ResultAggregator::new();
        for name in ["z", "a", "m"] {
            agg.push(pair(name, PairOutcome::Equal));
        }
        let names: Vec<&str> = agg.report.pairs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }
}
