use serde::Serialize;

use crate::domain::rules::{ComparisonConfig, IgnoreRule, SmartIgnoreRule};

/// Construction defaults for a [`RuleStore`] (and the service that owns it).
#[derive(Debug, Clone)]
pub struct CompareDefaults {
    pub max_differences: usize,
    pub default_ignore_collection_order: bool,
    pub default_ignore_string_case: bool,
    /// Upper bound on pairs compared in parallel.
    pub concurrency: usize,
}

impl Default for CompareDefaults {
    fn default() -> Self {
        Self {
            max_differences: 1000,
            default_ignore_collection_order: false,
            default_ignore_string_case: false,
            concurrency: 8,
        }
    }
}

// ─── RuleStore ────────────────────────────────────────────────────────────────

/// Process-wide ignore rule state: the live comparison configuration plus the
/// ordered exact and smart rule sets.
///
/// Mutated only through this API, between comparison runs. A run never reads
/// the store directly — it takes a [`RuleSnapshot`] once at its start, so
/// rule edits for the next run cannot race in-flight filtering.
#[derive(Debug, Default)]
pub struct RuleStore {
    config: ComparisonConfig,
    ignore_rules: Vec<IgnoreRule>,
    smart_rules: Vec<SmartIgnoreRule>,
    normalize_properties: Vec<String>,
}

impl RuleStore {
    pub fn new(defaults: &CompareDefaults) -> Self {
        Self {
            config: ComparisonConfig {
                max_differences: defaults.max_differences,
                ignore_collection_order: defaults.default_ignore_collection_order,
                ignore_string_case: defaults.default_ignore_string_case,
                ..ComparisonConfig::default()
            },
            ..Self::default()
        }
    }

    // ── Exact rules ──

    /// Duplicate paths are kept in insertion order for audit; the filter
    /// treats presence, not count, as the match signal.
    pub fn add_ignore_rule(&mut self, rule: IgnoreRule) {
        self.ignore_rules.push(rule);
    }

    pub fn add_ignore_rules(&mut self, rules: impl IntoIterator<Item = IgnoreRule>) {
        self.ignore_rules.extend(rules);
    }

    /// Removing a non-present path is a no-op. Removes every rule with the
    /// path (duplicates included).
    pub fn remove_ignored_property(&mut self, path: &str) {
        self.ignore_rules.retain(|r| r.path != path);
    }

    pub fn clear_ignore_rules(&mut self) {
        self.ignore_rules.clear();
    }

    pub fn ignore_rules(&self) -> &[IgnoreRule] {
        &self.ignore_rules
    }

    /// Path strings of the exact rule set.
    pub fn ignored_properties(&self) -> Vec<String> {
        self.ignore_rules.iter().map(|r| r.path.clone()).collect()
    }

    // ── Smart rules ──

    pub fn add_smart_ignore_rule(&mut self, rule: SmartIgnoreRule) {
        self.smart_rules.push(rule);
    }

    pub fn remove_smart_ignore_rule(&mut self, rule: &SmartIgnoreRule) {
        self.smart_rules.retain(|r| r != rule);
    }

    pub fn clear_smart_ignore_rules(&mut self) {
        self.smart_rules.clear();
    }

    pub fn smart_ignore_rules(&self) -> &[SmartIgnoreRule] {
        &self.smart_rules
    }

    // ── Configuration ──

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    pub fn set_max_differences(&mut self, max: usize) {
        self.config.max_differences = max;
    }

    pub fn set_ignore_collection_order(&mut self, ignore: bool) {
        self.config.ignore_collection_order = ignore;
    }

    pub fn set_ignore_string_case(&mut self, ignore: bool) {
        self.config.ignore_string_case = ignore;
    }

    /// Properties zeroed on both sides before the structural diff runs.
    pub fn set_normalize_properties(&mut self, properties: Vec<String>) {
        self.normalize_properties = properties;
    }

    pub fn normalize_properties(&self) -> &[String] {
        &self.normalize_properties
    }

    /// Push the current exact rule set into the engine-facing configuration:
    /// rule paths become structurally excluded paths (the engine never emits
    /// differences for them) and per-rule collection-order overrides become
    /// unordered paths.
    ///
    /// This is an optimization on top of, not a replacement for, the post-hoc
    /// filter — rules added after a comparison ran still filter its
    /// already-produced differences.
    pub fn apply_configured_settings(&mut self) {
        self.config.excluded_paths = self.ignored_properties();
        self.config.unordered_paths = self
            .ignore_rules
            .iter()
            .filter(|r| r.ignore_collection_order == Some(true))
            .map(|r| r.path.clone())
            .collect();
    }

    /// Immutable copy of the full rule state for one comparison run.
    pub fn snapshot(&self) -> RuleSnapshot {
        RuleSnapshot {
            config: self.config.clone(),
            ignore_rules: self.ignore_rules.clone(),
            smart_rules: self.smart_rules.clone(),
            normalize_properties: self.normalize_properties.clone(),
        }
    }
}

// ─── RuleSnapshot ─────────────────────────────────────────────────────────────

/// Frozen rule state used by every pure function of one comparison run.
/// Multiple pair comparisons share one snapshot while the store stays
/// editable for the next run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleSnapshot {
    pub config: ComparisonConfig,
    #[serde(skip)]
    pub ignore_rules: Vec<IgnoreRule>,
    #[serde(skip)]
    pub smart_rules: Vec<SmartIgnoreRule>,
    pub normalize_properties: Vec<String>,
}
