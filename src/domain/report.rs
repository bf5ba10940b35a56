use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::pair::PairResult;

/// Aggregate over all compared pairs of one run.
///
/// Built by a single left-to-right fold (`application::aggregate`). The
/// `pairs` sequence preserves input order so reports are reproducible across
/// runs on the same inputs; `metadata` counts are order-independent.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub created_at: String,
    /// True only while every folded pair is equal; flips false permanently on
    /// the first unequal or errored pair.
    pub all_equal: bool,
    pub total_pairs: usize,
    pub pairs: Vec<PairResult>,
    /// Count statistics keyed by `outcome.<name>` and `error.<kind>`.
    pub metadata: BTreeMap<String, u64>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            run_id: format!(
                "run_{}_{}",
                Utc::now().format("%Y%m%d_%H%M%S"),
                Uuid::new_v4().simple()
            ),
            created_at: Utc::now().to_rfc3339(),
            all_equal: true,
            total_pairs: 0,
            pairs: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
