use std::sync::{Arc, RwLock};

use anyhow::Result;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::application::aggregate::ResultAggregator;
use crate::application::classify::{classify, ClassifierInput};
use crate::application::filter::apply_filters;
use crate::application::normalize::normalize_property_values;
use crate::application::rule_store::{CompareDefaults, RuleSnapshot, RuleStore};
use crate::domain::difference::ComparisonResult;
use crate::domain::fingerprint::fingerprint;
use crate::domain::outcome::PairOutcome;
use crate::domain::pair::{PairInput, PairResult, SideError, SideInput};
use crate::domain::ports::{DiffEngine, LineDiffer};
use crate::domain::report::RunReport;
use crate::domain::rules::{ComparisonConfig, IgnoreRule, SmartIgnoreRule};
use crate::domain::text_diff::RawTextDifference;

// ─── CompareService ───────────────────────────────────────────────────────────

/// Runs the full per-pair pipeline (deserialize → normalize → diff → filter →
/// classify) and folds many pairs into a [`RunReport`].
///
/// Owns the process-wide [`RuleStore`]; every run takes one immutable rule
/// snapshot up front, so rule edits between runs never race an in-flight
/// comparison. Pairs are independent and compared in parallel, bounded by the
/// configured concurrency limit; results are reassembled in input order
/// before the aggregation fold.
pub struct CompareService {
    engine: Arc<dyn DiffEngine>,
    line_differ: Arc<dyn LineDiffer>,
    store: RwLock<RuleStore>,
    concurrency: usize,
}

impl CompareService {
    pub fn new(
        engine: Arc<dyn DiffEngine>,
        line_differ: Arc<dyn LineDiffer>,
        defaults: CompareDefaults,
    ) -> Self {
        Self {
            engine,
            line_differ,
            store: RwLock::new(RuleStore::new(&defaults)),
            concurrency: defaults.concurrency.max(1),
        }
    }

    // ── Rule store surface ──
    //
    // Thin passthroughs behind the lock. Poisoning is unrecoverable here, so
    // the lock accessors panic like any other poisoned-lock read.

    pub fn add_ignore_rule(&self, rule: IgnoreRule) {
        self.store.write().unwrap().add_ignore_rule(rule);
    }

    pub fn add_ignore_rules(&self, rules: Vec<IgnoreRule>) {
        self.store.write().unwrap().add_ignore_rules(rules);
    }

    pub fn remove_ignored_property(&self, path: &str) {
        self.store.write().unwrap().remove_ignored_property(path);
    }

    pub fn clear_ignore_rules(&self) {
        self.store.write().unwrap().clear_ignore_rules();
    }

    pub fn ignore_rules(&self) -> Vec<IgnoreRule> {
        self.store.read().unwrap().ignore_rules().to_vec()
    }

    pub fn ignored_properties(&self) -> Vec<String> {
        self.store.read().unwrap().ignored_properties()
    }

    pub fn add_smart_ignore_rule(&self, rule: SmartIgnoreRule) {
        self.store.write().unwrap().add_smart_ignore_rule(rule);
    }

    pub fn remove_smart_ignore_rule(&self, rule: &SmartIgnoreRule) {
        self.store.write().unwrap().remove_smart_ignore_rule(rule);
    }

    pub fn clear_smart_ignore_rules(&self) {
        self.store.write().unwrap().clear_smart_ignore_rules();
    }

    pub fn smart_ignore_rules(&self) -> Vec<SmartIgnoreRule> {
        self.store.read().unwrap().smart_ignore_rules().to_vec()
    }

    pub fn current_config(&self) -> ComparisonConfig {
        self.store.read().unwrap().config().clone()
    }

    pub fn set_max_differences(&self, max: usize) {
        self.store.write().unwrap().set_max_differences(max);
    }

    pub fn set_ignore_collection_order(&self, ignore: bool) {
        self.store
            .write()
            .unwrap()
            .set_ignore_collection_order(ignore);
    }

    pub fn set_ignore_string_case(&self, ignore: bool) {
        self.store.write().unwrap().set_ignore_string_case(ignore);
    }

    pub fn set_normalize_properties(&self, properties: Vec<String>) {
        self.store
            .write()
            .unwrap()
            .set_normalize_properties(properties);
    }

    pub fn apply_configured_settings(&self) {
        self.store.write().unwrap().apply_configured_settings();
    }

    // ── Comparison ──

    /// Compare a single pair against a fresh rule snapshot.
    pub fn compare_one(&self, input: PairInput) -> PairResult {
        let snapshot = self.store.read().unwrap().snapshot();
        compare_pair(
            self.engine.as_ref(),
            self.line_differ.as_ref(),
            &snapshot,
            input,
        )
    }

    /// Compare all pairs in parallel and fold them, in input order, into a
    /// [`RunReport`].
    pub async fn compare_pairs(&self, inputs: Vec<PairInput>) -> Result<RunReport> {
        let snapshot = Arc::new(self.store.read().unwrap().snapshot());
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(inputs.len());

        for input in inputs {
            let engine = Arc::clone(&self.engine);
            let line_differ = Arc::clone(&self.line_differ);
            let snapshot = Arc::clone(&snapshot);
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                // The semaphore is never closed; a failed acquire only means
                // the permit is skipped, not that the pair is dropped.
                let _permit = semaphore.acquire_owned().await.ok();
                compare_pair(engine.as_ref(), line_differ.as_ref(), &snapshot, input)
            });
            handles.push(handle);
        }

        // Handles are awaited in spawn order, so completion order of the
        // underlying tasks never leaks into the report.
        let mut aggregator = ResultAggregator::new();
        for handle in handles {
            aggregator.push(handle.await?);
        }
        Ok(aggregator.finish())
    }
}

// ─── Per-pair pipeline ────────────────────────────────────────────────────────

/// Run one pair through every stage, capturing stage failures on the result
/// instead of propagating them. Pure apart from reads of the snapshot.
pub fn compare_pair(
    engine: &dyn DiffEngine,
    line_differ: &dyn LineDiffer,
    snapshot: &RuleSnapshot,
    input: PairInput,
) -> PairResult {
    let mut result = PairResult {
        name: input.name.clone(),
        relative_path: input.relative_path.clone(),
        source_path: input.source_path.clone(),
        target_path: input.target_path.clone(),
        source_status: input.source.status,
        target_status: input.target.status,
        comparison: None,
        summary: None,
        outcome: PairOutcome::Equal,
        text_differences: Vec::new(),
        error_message: None,
        error_type: None,
    };

    // Stage: upstream retrieval/deserialization failures.
    if let Some(error) = upstream_error(&input) {
        return errored(result, error);
    }

    // Stage: status codes, before any structural work.
    if let (Some(source), Some(target)) = (input.source.status, input.target.status) {
        if source != target {
            result
                .text_differences
                .push(RawTextDifference::status_codes(source, target));
            append_raw_diff(&mut result, line_differ, &input);
            result.summary = None;
            let outcome = classify(classifier_input(&result, 0, false));
            result.outcome = outcome;
            debug!(pair = %result.name, source, target, "status code mismatch");
            return result;
        }
        if !(200..300).contains(&source) {
            // Non-success bodies are compared as text, not structure.
            append_raw_diff(&mut result, line_differ, &input);
            let outcome = classify(classifier_input(&result, 0, false));
            result.outcome = outcome;
            return result;
        }
    }

    // Stage: resolve bodies, parsing raw text late if the orchestrator did
    // not deserialize upstream.
    let source_body = match resolve_body(&input.source) {
        Ok(body) => body,
        Err(error) => return errored(result, error),
    };
    let target_body = match resolve_body(&input.target) {
        Ok(body) => body,
        Err(error) => return errored(result, error),
    };

    // Stage: pre-comparison normalization of configured volatile properties.
    let mut source_body = source_body;
    let mut target_body = target_body;
    normalize_property_values(&mut source_body, &snapshot.normalize_properties);
    normalize_property_values(&mut target_body, &snapshot.normalize_properties);

    // Stage: structural diff, with a fingerprint fast path that skips the
    // engine when both bodies hash identically.
    let raw = if fingerprint(&source_body) == fingerprint(&target_body) {
        debug!(pair = %result.name, "fingerprints match, engine skipped");
        ComparisonResult::empty(snapshot.config.clone())
    } else {
        match engine.diff(&source_body, &target_body, &snapshot.config) {
            Ok(raw) => raw,
            Err(err) => {
                return errored(
                    result,
                    SideError::new("ComparisonError", err.to_string()),
                );
            }
        }
    };

    // Stage: filter (exact then smart) and classify.
    let filtered = apply_filters(snapshot, &raw);
    let summary = filtered.summary();
    result.summary = Some(summary);
    result.comparison = Some(filtered.result);
    let outcome = classify(classifier_input(&result, summary.total_differences, false));
    result.outcome = outcome;
    debug!(
        pair = %result.name,
        raw = raw.differences.len(),
        kept = summary.total_differences,
        suppressed = summary.suppressed(),
        outcome = %result.outcome,
        "pair compared"
    );
    result
}

fn upstream_error(input: &PairInput) -> Option<SideError> {
    input
        .source
        .error
        .clone()
        .or_else(|| input.target.error.clone())
}

fn errored(mut result: PairResult, error: SideError) -> PairResult {
    result.error_message = Some(error.message);
    result.error_type = Some(error.kind);
    result.summary = None;
    let outcome = classify(classifier_input(&result, 0, true));
    result.outcome = outcome;
    result
}

fn resolve_body(side: &SideInput) -> Result<Value, SideError> {
    if let Some(body) = &side.body {
        return Ok(body.clone());
    }
    match &side.raw {
        Some(raw) => serde_json::from_str(raw).map_err(|err| {
            SideError::new("DeserializationError", format!("invalid body: {}", err))
        }),
        None => Err(SideError::new("DeserializationError", "no body to compare")),
    }
}

fn append_raw_diff(result: &mut PairResult, line_differ: &dyn LineDiffer, input: &PairInput) {
    if let (Some(source), Some(target)) = (&input.source.raw, &input.target.raw) {
        result
            .text_differences
            .extend(line_differ.line_diff(source, target));
    }
}

fn classifier_input(result: &PairResult, filtered_count: usize, has_error: bool) -> ClassifierInput<'_> {
    ClassifierInput {
        source_status: result.source_status,
        target_status: result.target_status,
        filtered_count,
        has_error,
        text_differences: &result.text_differences,
    }
}
