use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::rule_store::CompareDefaults;
use crate::domain::rules::{RuleError, SmartIgnoreRule};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub source: FolderConfig,
    pub target: FolderConfig,
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// One side of a folder comparison.
#[derive(Debug, Deserialize, Clone)]
pub struct FolderConfig {
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CompareConfig {
    pub max_differences: usize,
    pub ignore_collection_order: bool,
    pub ignore_string_case: bool,
    /// Upper bound on pairs compared in parallel.
    pub concurrency: usize,
    /// Properties zeroed on both sides before the structural diff.
    pub normalize_properties: Vec<String>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        let defaults = CompareDefaults::default();
        Self {
            max_differences: defaults.max_differences,
            ignore_collection_order: defaults.default_ignore_collection_order,
            ignore_string_case: defaults.default_ignore_string_case,
            concurrency: defaults.concurrency,
            normalize_properties: Vec::new(),
        }
    }
}

impl CompareConfig {
    pub fn defaults(&self) -> CompareDefaults {
        CompareDefaults {
            max_differences: self.max_differences,
            default_ignore_collection_order: self.ignore_collection_order,
            default_ignore_string_case: self.ignore_string_case,
            concurrency: self.concurrency,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RulesConfig {
    /// Exact property paths excluded from reported differences.
    #[serde(default)]
    pub ignored_paths: Vec<String>,
    /// Pattern-based rules.
    #[serde(default)]
    pub smart: Vec<SmartRuleConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmartRuleConfig {
    pub mode: SmartRuleMode,
    pub pattern: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SmartRuleMode {
    PropertyName,
    NamePattern,
    PathPattern,
}

impl SmartRuleConfig {
    /// Invalid patterns are rejected here, at load time.
    pub fn build(&self) -> Result<SmartIgnoreRule, RuleError> {
        match self.mode {
            SmartRuleMode::PropertyName => Ok(SmartIgnoreRule::by_property_name(
                self.pattern.clone(),
                self.reason.clone(),
            )),
            SmartRuleMode::NamePattern => {
                SmartIgnoreRule::by_name_pattern(&self.pattern, self.reason.clone())
            }
            SmartRuleMode::PathPattern => {
                SmartIgnoreRule::by_path_pattern(&self.pattern, self.reason.clone())
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "./reports".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let cfg: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;
        Ok(cfg)
    }
}
