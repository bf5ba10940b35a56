use std::fmt::Write as FmtWrite;

use anyhow::Result;

use crate::domain::ports::ReportWriter;
use crate::domain::report::RunReport;

/// Human-readable plain text report: one block per pair, differences listed
/// by path, metadata counters at the end. Suitable for CI logs and diffs of
/// reports themselves.
pub struct TextWriter;

impl ReportWriter for TextWriter {
    fn format(&self, report: &RunReport) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "run {}", report.run_id)?;
        writeln!(out, "created {}", report.created_at)?;
        writeln!(
            out,
            "{} pairs compared, all equal: {}",
            report.total_pairs, report.all_equal
        )?;
        writeln!(out)?;

        for pair in &report.pairs {
            let identity = pair.relative_path.as_deref().unwrap_or(&pair.name);
            writeln!(out, "[{}] {}", pair.outcome, identity)?;

            if let (Some(source), Some(target)) = (pair.source_status, pair.target_status) {
                writeln!(out, "  status: {} vs {}", source, target)?;
            }
            if let Some(message) = &pair.error_message {
                let kind = pair.error_type.as_deref().unwrap_or("Error");
                writeln!(out, "  error ({}): {}", kind, message)?;
            }
            if let Some(summary) = &pair.summary {
                writeln!(
                    out,
                    "  differences: {} (suppressed: {})",
                    summary.total_differences,
                    summary.suppressed()
                )?;
            }
            if let Some(comparison) = &pair.comparison {
                for diff in &comparison.differences {
                    writeln!(out, "    {}", diff.description)?;
                }
            }
            for text_diff in &pair.text_differences {
                writeln!(out, "    {}", text_diff.description)?;
            }
        }

        if !report.metadata.is_empty() {
            writeln!(out)?;
            writeln!(out, "counts:")?;
            for (key, count) in &report.metadata {
                writeln!(out, "  {} = {}", key, count)?;
            }
        }
        Ok(out)
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}
