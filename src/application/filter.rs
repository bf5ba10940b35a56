use crate::application::rule_store::RuleSnapshot;
use crate::domain::difference::{ComparisonResult, Difference, DifferenceSummary};

/// A comparison result after both filter stages, with suppression counts.
#[derive(Debug, Clone)]
pub struct FilteredResult {
    pub result: ComparisonResult,
    pub suppressed_exact: usize,
    pub suppressed_smart: usize,
}

impl FilteredResult {
    pub fn summary(&self) -> DifferenceSummary {
        DifferenceSummary::new(
            self.result.differences.len(),
            self.suppressed_exact,
            self.suppressed_smart,
        )
    }
}

/// Drop every difference matched by any exact ignore rule.
///
/// Pure function of (snapshot, input): the input is not mutated and relative
/// order among kept differences is preserved. Empty rule set and empty input
/// are both identity cases.
pub fn filter_ignored_differences(
    snapshot: &RuleSnapshot,
    result: &ComparisonResult,
) -> (ComparisonResult, usize) {
    filter(result, |diff| {
        snapshot.ignore_rules.iter().any(|r| r.matches(&diff.path))
    })
}

/// Drop every difference matched by any smart ignore rule.
pub fn filter_smart_ignored_differences(
    snapshot: &RuleSnapshot,
    result: &ComparisonResult,
) -> (ComparisonResult, usize) {
    filter(result, |diff| {
        snapshot.smart_rules.iter().any(|r| r.matches(&diff.path))
    })
}

/// Both stages in order: exact rules first, smart rules on the remainder.
/// A difference suppressed by either stage is suppressed overall.
pub fn apply_filters(snapshot: &RuleSnapshot, result: &ComparisonResult) -> FilteredResult {
    let (exact_filtered, suppressed_exact) = filter_ignored_differences(snapshot, result);
    let (result, suppressed_smart) = filter_smart_ignored_differences(snapshot, &exact_filtered);
    FilteredResult {
        result,
        suppressed_exact,
        suppressed_smart,
    }
}

fn filter(
    result: &ComparisonResult,
    suppressed: impl Fn(&Difference) -> bool,
) -> (ComparisonResult, usize) {
    let kept: Vec<Difference> = result
        .differences
        .iter()
        .filter(|d| !suppressed(d))
        .cloned()
        .collect();
    let dropped = result.differences.len() - kept.len();
    (ComparisonResult::new(result.config.clone(), kept), dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::path::PropertyPath;
    use crate::domain::rules::{ComparisonConfig, IgnoreRule, SmartIgnoreRule};
    use serde_json::json;

    fn diff(path: &str) -> Difference {
        Difference::new(PropertyPath::parse(path), json!("a"), json!("b"))
    }

    fn result(paths: &[&str]) -> ComparisonResult {
        ComparisonResult::new(
            ComparisonConfig::default(),
            paths.iter().map(|p| diff(p)).collect(),
        )
    }

    fn snapshot_with_exact(paths: &[&str]) -> RuleSnapshot {
        RuleSnapshot {
            ignore_rules: paths.iter().map(|p| IgnoreRule::new(*p)).collect(),
            ..RuleSnapshot::default()
        }
    }

    #[test]
    fn empty_rule_set_is_identity() {
        let input = result(&["a.b", "c[0].d"]);
        let snap = RuleSnapshot::default();

        let (exact, dropped) = filter_ignored_differences(&snap, &input);
        assert_eq!(dropped, 0);
        assert_eq!(exact.differences, input.differences);

        let (smart, dropped) = filter_smart_ignored_differences(&snap, &input);
        assert_eq!(dropped, 0);
        assert_eq!(smart.differences, input.differences);
    }

    #[test]
    fn exact_rule_removes_only_its_path_and_keeps_order() {
        let input = result(&["keep.one", "drop.me", "keep.two", "drop.me"]);
        let snap = snapshot_with_exact(&["drop.me"]);

        let (filtered, dropped) = filter_ignored_differences(&snap, &input);
        assert_eq!(dropped, 2);
        let kept: Vec<String> = filtered
            .differences
            .iter()
            .map(|d| d.path.render())
            .collect();
        assert_eq!(kept, vec!["keep.one", "keep.two"]);
    }

    #[test]
    fn smart_name_rule_removes_regardless_of_full_path() {
        let input = result(&["timestamp", "a.b.timestamp", "a.timestamp.z", "other"]);
        let snap = RuleSnapshot {
            smart_rules: vec![SmartIgnoreRule::by_property_name("timestamp", "volatile")],
            ..RuleSnapshot::default()
        };

        let (filtered, dropped) = filter_smart_ignored_differences(&snap, &input);
        assert_eq!(dropped, 2);
        let kept: Vec<String> = filtered
            .differences
            .iter()
            .map(|d| d.path.render())
            .collect();
        assert_eq!(kept, vec!["a.timestamp.z", "other"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let input = result(&["a", "b", "c"]);
        let mut snap = snapshot_with_exact(&["b"]);
        snap.smart_rules = vec![SmartIgnoreRule::by_property_name("c", "noise")];

        let once = apply_filters(&snap, &input);
        let twice = apply_filters(&snap, &once.result);

        assert_eq!(once.result.differences, twice.result.differences);
        assert_eq!(twice.suppressed_exact, 0);
        assert_eq!(twice.suppressed_smart, 0);
    }

    #[test]
    fn exact_then_smart_suppression_is_cumulative() {
        let input = result(&["drop.exact", "drop_smart", "kept"]);
        let mut snap = snapshot_with_exact(&["drop.exact"]);
        snap.smart_rules =
            vec![SmartIgnoreRule::by_name_pattern("^drop_", "prefixed noise").unwrap()];

        let filtered = apply_filters(&snap, &input);
        assert_eq!(filtered.suppressed_exact, 1);
        assert_eq!(filtered.suppressed_smart, 1);
        assert_eq!(filtered.result.differences.len(), 1);

        let summary = filtered.summary();
        assert_eq!(summary.total_differences, 1);
        assert_eq!(summary.suppressed(), 2);
        assert!(!summary.are_equal);
    }

    #[test]
    fn suppressing_everything_reports_equal() {
        let input = result(&["only.diff"]);
        let snap = snapshot_with_exact(&["only.diff"]);
        let filtered = apply_filters(&snap, &input);
        assert!(filtered.summary().are_equal);
        assert_eq!(filtered.summary().suppressed(), 1);
    }
}
