use anyhow::Result;
use serde_json::Value;

use crate::domain::difference::{ComparisonResult, Difference};
use crate::domain::fingerprint::fingerprint;
use crate::domain::path::{PathSegment, PropertyPath};
use crate::domain::ports::{DiffEngine, LineDiffer};
use crate::domain::rules::ComparisonConfig;
use crate::domain::text_diff::RawTextDifference;

// ─── JsonDiffEngine ──────────────────────────────────────────────────────────

/// Reference implementation of the `DiffEngine` port: a recursive walk over
/// two JSON object graphs.
///
/// Honors the full engine-facing configuration: structurally excluded paths
/// (whole subtrees are pruned before producing differences), the
/// max-differences cap, case-insensitive string comparison, and unordered
/// collection comparison (globally or per path).
#[derive(Default)]
pub struct JsonDiffEngine;

impl JsonDiffEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DiffEngine for JsonDiffEngine {
    fn diff(
        &self,
        source: &Value,
        target: &Value,
        config: &ComparisonConfig,
    ) -> Result<ComparisonResult> {
        let mut differences = Vec::new();
        walk(&PropertyPath::root(), source, target, config, &mut differences);
        Ok(ComparisonResult::new(config.clone(), differences))
    }
}

fn walk(
    path: &PropertyPath,
    source: &Value,
    target: &Value,
    config: &ComparisonConfig,
    out: &mut Vec<Difference>,
) {
    if out.len() >= config.max_differences {
        return;
    }
    if is_excluded(path, config) {
        return;
    }

    match (source, target) {
        (Value::Object(a), Value::Object(b)) => {
            let mut keys: Vec<&String> = a.keys().chain(b.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let child = path.child(key);
                match (a.get(key), b.get(key)) {
                    (Some(left), Some(right)) => walk(&child, left, right, config, out),
                    (Some(left), None) => {
                        push(out, config, only_in(child, Some(left), None));
                    }
                    (None, Some(right)) => {
                        push(out, config, only_in(child, None, Some(right)));
                    }
                    (None, None) => unreachable!("key comes from the union"),
                }
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            walk_arrays(path, a, b, config, out);
        }
        (Value::String(a), Value::String(b)) => {
            let equal = if config.ignore_string_case {
                a.eq_ignore_ascii_case(b)
            } else {
                a == b
            };
            if !equal {
                push(out, config, Difference::new(path.clone(), source.clone(), target.clone()));
            }
        }
        (Value::Number(a), Value::Number(b)) => {
            let equal = match (a.as_f64(), b.as_f64()) {
                (Some(fa), Some(fb)) => float_eq(fa, fb),
                _ => a == b,
            };
            if !equal {
                push(out, config, Difference::new(path.clone(), source.clone(), target.clone()));
            }
        }
        _ => {
            if source != target {
                push(out, config, Difference::new(path.clone(), source.clone(), target.clone()));
            }
        }
    }
}

fn walk_arrays(
    path: &PropertyPath,
    source: &[Value],
    target: &[Value],
    config: &ComparisonConfig,
    out: &mut Vec<Difference>,
) {
    let unordered = config.ignore_collection_order
        || config.unordered_paths.iter().any(|p| p == &path.render());

    // Unordered comparison aligns both sides by canonical content before the
    // pairwise walk, so permutations produce no differences.
    let (source, target): (Vec<&Value>, Vec<&Value>) = if unordered {
        let mut a: Vec<&Value> = source.iter().collect();
        let mut b: Vec<&Value> = target.iter().collect();
        a.sort_by_cached_key(|v| fingerprint(v));
        b.sort_by_cached_key(|v| fingerprint(v));
        (a, b)
    } else {
        (source.iter().collect(), target.iter().collect())
    };

    let common = source.len().min(target.len());
    for i in 0..common {
        walk(&indexed(path, i), source[i], target[i], config, out);
    }
    for (i, left) in source.iter().enumerate().skip(common) {
        push(out, config, only_in(indexed(path, i), Some(*left), None));
    }
    for (i, right) in target.iter().enumerate().skip(common) {
        push(out, config, only_in(indexed(path, i), None, Some(*right)));
    }
}

/// Element path: the collection's own segment with the index attached. A last
/// segment that already carries an index is a nested sequence level, so the
/// new index goes on its own index-only segment (`m[1][0]`).
fn indexed(path: &PropertyPath, index: usize) -> PropertyPath {
    let mut segments = path.segments().to_vec();
    match segments.last_mut() {
        Some(last) if last.index.is_none() => last.index = Some(index),
        _ => segments.push(PathSegment::indexed("", index)),
    }
    PropertyPath::from_segments(segments)
}

fn only_in(path: PropertyPath, left: Option<&Value>, right: Option<&Value>) -> Difference {
    let side = if left.is_some() { "source" } else { "target" };
    Difference::with_description(
        path.clone(),
        left.cloned().unwrap_or(Value::Null),
        right.cloned().unwrap_or(Value::Null),
        format!("{}: only in {}", path, side),
    )
}

fn push(out: &mut Vec<Difference>, config: &ComparisonConfig, diff: Difference) {
    if out.len() < config.max_differences && !is_excluded(&diff.path, config) {
        out.push(diff);
    }
}

fn is_excluded(path: &PropertyPath, config: &ComparisonConfig) -> bool {
    if config.excluded_paths.is_empty() || path.is_root() {
        return false;
    }
    let rendered = path.render();
    config.excluded_paths.iter().any(|p| p == &rendered)
}

fn float_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ─── PlainLineDiffer ─────────────────────────────────────────────────────────

/// Reference implementation of the `LineDiffer` port: positional line
/// comparison with 1-based numbering. Good enough for short error bodies;
/// swap in a real LCS differ behind the port for anything fancier.
#[derive(Default)]
pub struct PlainLineDiffer;

impl PlainLineDiffer {
    pub fn new() -> Self {
        Self
    }
}

impl LineDiffer for PlainLineDiffer {
    fn line_diff(&self, source: &str, target: &str) -> Vec<RawTextDifference> {
        let source_lines: Vec<&str> = source.lines().collect();
        let target_lines: Vec<&str> = target.lines().collect();
        let common = source_lines.len().min(target_lines.len());
        let mut diffs = Vec::new();

        for i in 0..common {
            if source_lines[i] != target_lines[i] {
                diffs.push(RawTextDifference::modified(
                    i + 1,
                    source_lines[i],
                    target_lines[i],
                ));
            }
        }
        for (i, line) in source_lines.iter().enumerate().skip(common) {
            diffs.push(RawTextDifference::only_in_source(i + 1, line));
        }
        for (i, line) in target_lines.iter().enumerate().skip(common) {
            diffs.push(RawTextDifference::only_in_target(i + 1, line));
        }
        diffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::text_diff::TextDiffKind;
    use serde_json::json;

    fn diff_with(source: Value, target: Value, config: &ComparisonConfig) -> Vec<Difference> {
        JsonDiffEngine::new()
            .diff(&source, &target, config)
            .unwrap()
            .differences
    }

    fn paths(diffs: &[Difference]) -> Vec<String> {
        diffs.iter().map(|d| d.path.render()).collect()
    }

    // ── JsonDiffEngine ──

    #[test]
    fn identical_graphs_produce_no_differences() {
        let body = json!({"a": 1, "b": {"c": [1, 2]}});
        assert!(diff_with(body.clone(), body, &ComparisonConfig::default()).is_empty());
    }

    #[test]
    fn nested_difference_carries_full_path() {
        let diffs = diff_with(
            json!({"order": {"items": [{"price": 10}]}}),
            json!({"order": {"items": [{"price": 12}]}}),
            &ComparisonConfig::default(),
        );
        assert_eq!(paths(&diffs), vec!["order.items[0].price"]);
    }

    #[test]
    fn only_in_one_side_is_reported_per_key() {
        let diffs = diff_with(
            json!({"a": 1, "extra": true}),
            json!({"a": 1, "other": false}),
            &ComparisonConfig::default(),
        );
        assert_eq!(paths(&diffs), vec!["extra", "other"]);
        assert!(diffs[0].description.contains("only in source"));
        assert!(diffs[1].description.contains("only in target"));
    }

    #[test]
    fn excluded_path_prunes_whole_subtree() {
        let config = ComparisonConfig {
            excluded_paths: vec!["meta".to_string()],
            ..ComparisonConfig::default()
        };
        let diffs = diff_with(
            json!({"meta": {"build": "a", "time": 1}, "v": 1}),
            json!({"meta": {"build": "b", "time": 2}, "v": 1}),
            &config,
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn ignore_string_case_flag() {
        let config = ComparisonConfig {
            ignore_string_case: true,
            ..ComparisonConfig::default()
        };
        assert!(diff_with(json!({"s": "Hello"}), json!({"s": "hELLO"}), &config).is_empty());
        assert_eq!(
            diff_with(
                json!({"s": "Hello"}),
                json!({"s": "hELLO"}),
                &ComparisonConfig::default()
            )
            .len(),
            1
        );
    }

    #[test]
    fn float_tolerance_matches_near_equal_numbers() {
        let diffs = diff_with(
            json!({"v": 1.0000000001}),
            json!({"v": 1.0}),
            &ComparisonConfig::default(),
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn unordered_collections_globally() {
        let config = ComparisonConfig {
            ignore_collection_order: true,
            ..ComparisonConfig::default()
        };
        let diffs = diff_with(
            json!({"tags": ["b", "a", "c"]}),
            json!({"tags": ["a", "c", "b"]}),
            &config,
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn unordered_collection_per_path_override() {
        let config = ComparisonConfig {
            unordered_paths: vec!["tags".to_string()],
            ..ComparisonConfig::default()
        };
        let diffs = diff_with(
            json!({"tags": ["b", "a"], "steps": [1, 2]}),
            json!({"tags": ["a", "b"], "steps": [2, 1]}),
            &config,
        );
        // tags is order-free, steps is not
        assert_eq!(paths(&diffs), vec!["steps[0]", "steps[1]"]);
    }

    #[test]
    fn length_mismatch_reports_extra_entries() {
        let diffs = diff_with(
            json!({"items": [1, 2, 3]}),
            json!({"items": [1]}),
            &ComparisonConfig::default(),
        );
        assert_eq!(paths(&diffs), vec!["items[1]", "items[2]"]);
    }

    #[test]
    fn max_differences_caps_output() {
        let config = ComparisonConfig {
            max_differences: 2,
            ..ComparisonConfig::default()
        };
        let diffs = diff_with(
            json!({"a": 1, "b": 2, "c": 3, "d": 4}),
            json!({"a": 9, "b": 9, "c": 9, "d": 9}),
            &config,
        );
        assert_eq!(diffs.len(), 2);
    }

    #[test]
    fn top_level_array_renders_bare_indices() {
        let diffs = diff_with(json!([1, 2]), json!([1, 3]), &ComparisonConfig::default());
        assert_eq!(paths(&diffs), vec!["[1]"]);
    }

    #[test]
    fn nested_array_difference_keeps_both_indices() {
        let diffs = diff_with(
            json!({"m": [[1, 2], [3, 4]]}),
            json!({"m": [[1, 2], [9, 4]]}),
            &ComparisonConfig::default(),
        );
        assert_eq!(paths(&diffs), vec!["m[1][0]"]);
    }

    #[test]
    fn ignoring_one_nested_element_does_not_hide_siblings() {
        let config = ComparisonConfig {
            excluded_paths: vec!["m[0]".to_string()],
            ..ComparisonConfig::default()
        };
        let diffs = diff_with(
            json!({"m": [[1], [3]]}),
            json!({"m": [[2], [9]]}),
            &config,
        );
        assert_eq!(paths(&diffs), vec!["m[1][0]"]);
    }

    // ── PlainLineDiffer ──

    #[test]
    fn line_diff_reports_modified_and_extra_lines() {
        let diffs = PlainLineDiffer::new().line_diff("a\nb\nc", "a\nx");
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].kind, TextDiffKind::Modified);
        assert_eq!(diffs[0].source_line, Some(2));
        assert_eq!(diffs[1].kind, TextDiffKind::OnlyInSource);
        assert_eq!(diffs[1].source_line, Some(3));
    }

    #[test]
    fn identical_text_has_no_line_diffs() {
        assert!(PlainLineDiffer::new().line_diff("same\nbody", "same\nbody").is_empty());
    }
}
