use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::domain::path::PropertyPath;

/// Failure constructing an ignore rule.
///
/// Pattern rules compile their regex at construction time — a bad pattern is
/// rejected here, never deferred to match time.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// ─── Exact rules ──────────────────────────────────────────────────────────────

/// Exact-path ignore rule.
///
/// Matches a difference when the rule path equals the difference path's
/// canonical rendering byte-for-byte. Equality between rules is by path only
/// so removal works regardless of per-rule overrides.
#[derive(Debug, Clone, Serialize)]
pub struct IgnoreRule {
    pub path: String,
    /// Scoped override: compare the collection at this path without regard
    /// to element order, even when the global flag is off.
    pub ignore_collection_order: Option<bool>,
}

impl IgnoreRule {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ignore_collection_order: None,
        }
    }

    pub fn with_collection_order_ignored(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ignore_collection_order: Some(true),
        }
    }

    pub fn matches(&self, path: &PropertyPath) -> bool {
        self.path == path.render()
    }
}

impl PartialEq for IgnoreRule {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for IgnoreRule {}

// ─── Smart rules ──────────────────────────────────────────────────────────────

/// How a smart rule selects the differences it suppresses.
///
/// Closed sum type, matched exhaustively by [`SmartIgnoreRule::matches`] —
/// adding a mode is a compile-time-checked change at every match site.
#[derive(Debug, Clone)]
pub enum SmartMatcher {
    /// Last path segment equals this property name.
    PropertyName(String),
    /// Last path segment name matches this expression.
    NamePattern(Regex),
    /// Full canonical path matches this expression.
    PathPattern(Regex),
}

/// Pattern-based ignore rule with an audit reason.
#[derive(Debug, Clone)]
pub struct SmartIgnoreRule {
    matcher: SmartMatcher,
    reason: String,
}

impl SmartIgnoreRule {
    pub fn by_property_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            matcher: SmartMatcher::PropertyName(name.into()),
            reason: reason.into(),
        }
    }

    pub fn by_name_pattern(
        pattern: &str,
        reason: impl Into<String>,
    ) -> Result<Self, RuleError> {
        Ok(Self {
            matcher: SmartMatcher::NamePattern(compile(pattern)?),
            reason: reason.into(),
        })
    }

    pub fn by_path_pattern(
        pattern: &str,
        reason: impl Into<String>,
    ) -> Result<Self, RuleError> {
        Ok(Self {
            matcher: SmartMatcher::PathPattern(compile(pattern)?),
            reason: reason.into(),
        })
    }

    pub fn matcher(&self) -> &SmartMatcher {
        &self.matcher
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The rule's pattern or name as entered by the user.
    pub fn value(&self) -> &str {
        match &self.matcher {
            SmartMatcher::PropertyName(name) => name,
            SmartMatcher::NamePattern(re) | SmartMatcher::PathPattern(re) => re.as_str(),
        }
    }

    pub fn matches(&self, path: &PropertyPath) -> bool {
        match &self.matcher {
            SmartMatcher::PropertyName(name) => path.last_name() == Some(name.as_str()),
            SmartMatcher::NamePattern(re) => {
                path.last_name().is_some_and(|last| re.is_match(last))
            }
            SmartMatcher::PathPattern(re) => re.is_match(&path.render()),
        }
    }
}

impl PartialEq for SmartIgnoreRule {
    fn eq(&self, other: &Self) -> bool {
        let same_mode = matches!(
            (&self.matcher, &other.matcher),
            (SmartMatcher::PropertyName(_), SmartMatcher::PropertyName(_))
                | (SmartMatcher::NamePattern(_), SmartMatcher::NamePattern(_))
                | (SmartMatcher::PathPattern(_), SmartMatcher::PathPattern(_))
        );
        same_mode && self.value() == other.value()
    }
}

fn compile(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

// ─── Comparison configuration ─────────────────────────────────────────────────

/// Options handed to the diff engine for one comparison run.
///
/// Mutated only through explicit `RuleStore` setters; the compare pipeline
/// reads an immutable snapshot (see `application::rule_store`).
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonConfig {
    /// Hard cap on reported differences per pair.
    pub max_differences: usize,
    /// Compare collections without regard to element order.
    pub ignore_collection_order: bool,
    /// Compare strings case-insensitively.
    pub ignore_string_case: bool,
    /// Paths the engine excludes structurally — pushed from the exact rule
    /// set by `RuleStore::apply_configured_settings`. An excluded path never
    /// produces a difference in the first place.
    pub excluded_paths: Vec<String>,
    /// Paths whose collections are compared unordered even when the global
    /// flag is off (per-rule overrides).
    pub unordered_paths: Vec<String>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            max_differences: 1000,
            ignore_collection_order: false,
            ignore_string_case: false,
            excluded_paths: Vec::new(),
            unordered_paths: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> PropertyPath {
        PropertyPath::parse(raw)
    }

    #[test]
    fn exact_rule_matches_canonical_rendering_only() {
        let rule = IgnoreRule::new("order.items[2].price");
        assert!(rule.matches(&path("order.items[2].price")));
        assert!(!rule.matches(&path("order.items[1].price")));
        assert!(!rule.matches(&path("order.items[2]")));
    }

    #[test]
    fn exact_rule_equality_ignores_overrides() {
        let plain = IgnoreRule::new("tags");
        let scoped = IgnoreRule::with_collection_order_ignored("tags");
        assert_eq!(plain, scoped);
    }

    #[test]
    fn property_name_rule_matches_any_depth() {
        let rule = SmartIgnoreRule::by_property_name("timestamp", "generated per request");
        assert!(rule.matches(&path("timestamp")));
        assert!(rule.matches(&path("audit.entries[4].timestamp")));
        assert!(!rule.matches(&path("timestamp.zone")));
    }

    #[test]
    fn name_pattern_rule_matches_last_segment() {
        let rule = SmartIgnoreRule::by_name_pattern("^.*_at$", "timestamps").unwrap();
        assert!(rule.matches(&path("created_at")));
        assert!(rule.matches(&path("order.updated_at")));
        assert!(!rule.matches(&path("attachment")));
    }

    #[test]
    fn path_pattern_rule_matches_full_rendering() {
        let rule = SmartIgnoreRule::by_path_pattern(r"^meta\..*", "volatile metadata").unwrap();
        assert!(rule.matches(&path("meta.build_id")));
        assert!(!rule.matches(&path("order.meta"))); // anchored at the start
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        let err = SmartIgnoreRule::by_name_pattern("(unclosed", "bad").unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
        assert!(SmartIgnoreRule::by_path_pattern("[z-a]", "bad").is_err());
    }

    #[test]
    fn smart_rule_equality_is_mode_and_value() {
        let a = SmartIgnoreRule::by_property_name("id", "one");
        let b = SmartIgnoreRule::by_property_name("id", "two");
        let c = SmartIgnoreRule::by_name_pattern("id", "regex mode").unwrap();
        assert_eq!(a, b); // reason is audit-only
        assert_ne!(a, c); // same value, different mode
    }
}
