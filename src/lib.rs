use anyhow::Result;
use std::sync::Arc;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// ─── Log level ────────────────────────────────────────────────────────────────

/// Controls the verbosity of respdiff's internal tracing output.
///
/// Pass to [`init_tracing`] before calling any async entry point.
///
/// | Variant | `tracing` level | When to use                            |
/// |---------|-----------------|----------------------------------------|
/// | `Error` | `error`         | `--quiet` / CI scripting               |
/// | `Info`  | `info`          | Default — shows per-run timings        |
/// | `Debug` | `debug`         | `--verbose` — shows per-pair outcomes  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Info,
    Debug,
}

/// Initialise the global `tracing` subscriber for respdiff.
///
/// This is a convenience wrapper around `tracing_subscriber`. It respects
/// `RUST_LOG` when set, falling back to `level` otherwise.
///
/// Call this **once** at application startup, before any respdiff async
/// function. Library consumers who manage their own subscriber should skip
/// this and configure tracing themselves.
///
/// Only available when the `cli` feature is enabled (pulls in
/// `tracing-subscriber`).
#[cfg(feature = "cli")]
pub fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;

    let default_filter = match level {
        LogLevel::Error => "respdiff=error",
        LogLevel::Info => "respdiff=info",
        LogLevel::Debug => "respdiff=debug",
    };

    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

// ─── Public API Facade ───

pub use application::compare::{compare_pair, CompareService};
pub use application::filter::{
    apply_filters, filter_ignored_differences, filter_smart_ignored_differences, FilteredResult,
};
pub use application::monitoring::PerfReport;
pub use application::normalize::normalize_property_values;
pub use application::rule_store::{CompareDefaults, RuleSnapshot, RuleStore};
pub use domain::difference::{ComparisonResult, Difference, DifferenceSummary};
pub use domain::fingerprint::fingerprint;
pub use domain::outcome::PairOutcome;
pub use domain::pair::{PairInput, PairResult, SideError, SideInput};
pub use domain::path::{PathSegment, PropertyPath};
pub use domain::ports::{DiffEngine, LineDiffer, PairProvider, ReportWriter};
pub use domain::report::RunReport;
pub use domain::rules::{ComparisonConfig, IgnoreRule, RuleError, SmartIgnoreRule, SmartMatcher};
pub use domain::text_diff::{RawTextDifference, TextDiffKind};
pub use infrastructure::config::{
    AppConfig, CompareConfig, FolderConfig, OutputConfig, RulesConfig, SmartRuleConfig,
    SmartRuleMode,
};
pub use infrastructure::engine::{JsonDiffEngine, PlainLineDiffer};
pub use infrastructure::fs::FsPairProvider;

use crate::application::monitoring::{MonitoringDiffEngine, MonitoringPairProvider};

// ─── Public entry points ───

/// Compare two capture folders end to end.
///
/// Returns the aggregated [`RunReport`]. Use [`run_with_timing`] if you also
/// want a performance report.
pub async fn run(cfg: &AppConfig) -> Result<RunReport> {
    let (report, _) = run_with_timing(cfg).await?;
    Ok(report)
}

/// Folder comparison with performance timing.
///
/// Returns the `RunReport` and a [`PerfReport`] containing discovery and
/// per-pair diff timings.
pub async fn run_with_timing(cfg: &AppConfig) -> Result<(RunReport, PerfReport)> {
    let perf = PerfReport::new();

    let provider = MonitoringPairProvider::new(
        Arc::new(FsPairProvider::new(&cfg.source.dir, &cfg.target.dir)),
        Arc::clone(&perf),
    );
    let engine = Arc::new(MonitoringDiffEngine::new(
        Arc::new(JsonDiffEngine::new()),
        Arc::clone(&perf),
    ));

    let service = build_service(cfg, engine)?;

    let pairs = provider.discover().await?;
    let report = service.compare_pairs(pairs).await?;

    let perf = perf.lock().unwrap().clone();
    Ok((report, perf))
}

/// Build a [`CompareService`] from configuration, seeding the rule store.
///
/// Exposed so library consumers can pair the configured rule set with their
/// own `DiffEngine` (e.g. a domain-aware differ behind the port).
pub fn build_service(cfg: &AppConfig, engine: Arc<dyn DiffEngine>) -> Result<CompareService> {
    let service = CompareService::new(
        engine,
        Arc::new(PlainLineDiffer::new()),
        cfg.compare.defaults(),
    );

    service.set_normalize_properties(cfg.compare.normalize_properties.clone());
    service.add_ignore_rules(
        cfg.rules
            .ignored_paths
            .iter()
            .map(|path| IgnoreRule::new(path.clone()))
            .collect(),
    );
    for smart in &cfg.rules.smart {
        service.add_smart_ignore_rule(smart.build()?);
    }
    service.apply_configured_settings();

    Ok(service)
}
