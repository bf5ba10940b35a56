use anyhow::Result;

use crate::domain::ports::ReportWriter;
use crate::domain::report::RunReport;

/// Machine-readable report: the full `RunReport` as pretty-printed JSON,
/// including every kept difference and the metadata counters.
pub struct JsonWriter;

impl ReportWriter for JsonWriter {
    fn format(&self, report: &RunReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_valid_json_with_counts() {
        let report = RunReport::new();
        let out = JsonWriter.format(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["total_pairs"], 0);
        assert_eq!(parsed["all_equal"], true);
    }
}
