use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domain::difference::ComparisonResult;
use crate::domain::pair::PairInput;
use crate::domain::ports::{DiffEngine, PairProvider};
use crate::domain::rules::ComparisonConfig;

// ─── PerfReport ──────────────────────────────────────────────────────────────

/// A single timed operation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OpTiming {
    /// Operation name: "discover_pairs" or "diff_pair".
    pub operation: &'static str,
    /// Elapsed wall time in milliseconds.
    pub duration_ms: u128,
    /// Number of items involved (pairs discovered or differences produced).
    pub items: usize,
}

/// Accumulated performance timings for a single comparison run.
///
/// Shared across all decorator instances for one run via `Arc<Mutex<_>>`.
/// After the run, pass to the CLI summary to render a per-operation view.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct PerfReport {
    pub timings: Vec<OpTiming>,
    pub total_pairs_discovered: usize,
    pub total_ms: u128,
}

impl PerfReport {
    pub fn new() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::default()))
    }

    fn record(report: &Arc<Mutex<Self>>, timing: OpTiming) {
        if let Ok(mut r) = report.lock() {
            r.total_ms += timing.duration_ms;
            if timing.operation == "discover_pairs" {
                r.total_pairs_discovered += timing.items;
            }
            r.timings.push(timing);
        }
    }
}

// ─── MonitoringPairProvider ──────────────────────────────────────────────────

/// Decorator: wraps any `PairProvider`, measures wall time per `discover`
/// call, and appends the result to the shared `PerfReport`.
pub struct MonitoringPairProvider {
    inner: Arc<dyn PairProvider>,
    report: Arc<Mutex<PerfReport>>,
}

impl MonitoringPairProvider {
    pub fn new(inner: Arc<dyn PairProvider>, report: Arc<Mutex<PerfReport>>) -> Self {
        Self { inner, report }
    }
}

#[async_trait]
impl PairProvider for MonitoringPairProvider {
    #[instrument(name = "discover_pairs", skip(self), level = "info")]
    async fn discover(&self) -> Result<Vec<PairInput>> {
        let start = Instant::now();
        let pairs = self.inner.discover().await?;
        let duration_ms = start.elapsed().as_millis();

        info!(pairs = pairs.len(), duration_ms, "discover_pairs completed");

        PerfReport::record(
            &self.report,
            OpTiming {
                operation: "discover_pairs",
                duration_ms,
                items: pairs.len(),
            },
        );

        Ok(pairs)
    }
}

// ─── MonitoringDiffEngine ────────────────────────────────────────────────────

/// Decorator: wraps any `DiffEngine`, measures wall time per `diff` call,
/// and appends the result to the shared `PerfReport`.
pub struct MonitoringDiffEngine {
    inner: Arc<dyn DiffEngine>,
    report: Arc<Mutex<PerfReport>>,
}

impl MonitoringDiffEngine {
    pub fn new(inner: Arc<dyn DiffEngine>, report: Arc<Mutex<PerfReport>>) -> Self {
        Self { inner, report }
    }
}

impl DiffEngine for MonitoringDiffEngine {
    #[instrument(name = "diff_pair", skip_all, level = "info")]
    fn diff(
        &self,
        source: &Value,
        target: &Value,
        config: &ComparisonConfig,
    ) -> Result<ComparisonResult> {
        let start = Instant::now();
        let result = self.inner.diff(source, target, config)?;
        let duration_ms = start.elapsed().as_millis();

        info!(
            differences = result.differences.len(),
            duration_ms, "diff_pair completed"
        );

        PerfReport::record(
            &self.report,
            OpTiming {
                operation: "diff_pair",
                duration_ms,
                items: result.differences.len(),
            },
        );

        Ok(result)
    }
}
