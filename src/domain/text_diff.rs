use serde::Serialize;

/// Kind of a line-level text difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDiffKind {
    OnlyInSource,
    OnlyInTarget,
    Modified,
    StatusCodeDifference,
}

/// Fallback representation used when structural comparison is not applicable
/// (non-success status on one or both sides, or unparseable bodies).
///
/// Produced by a line differ, not the structural engine. Line numbers are
/// 1-based; a side without a counterpart line carries `None`.
#[derive(Debug, Clone, Serialize)]
pub struct RawTextDifference {
    pub kind: TextDiffKind,
    pub source_line: Option<usize>,
    pub target_line: Option<usize>,
    pub source_text: Option<String>,
    pub target_text: Option<String>,
    pub description: String,
}

impl RawTextDifference {
    pub fn modified(line: usize, source_text: &str, target_text: &str) -> Self {
        Self {
            kind: TextDiffKind::Modified,
            source_line: Some(line),
            target_line: Some(line),
            source_text: Some(source_text.to_string()),
            target_text: Some(target_text.to_string()),
            description: format!("line {}: {:?} != {:?}", line, source_text, target_text),
        }
    }

    pub fn only_in_source(line: usize, text: &str) -> Self {
        Self {
            kind: TextDiffKind::OnlyInSource,
            source_line: Some(line),
            target_line: None,
            source_text: Some(text.to_string()),
            target_text: None,
            description: format!("line {} only in source: {:?}", line, text),
        }
    }

    pub fn only_in_target(line: usize, text: &str) -> Self {
        Self {
            kind: TextDiffKind::OnlyInTarget,
            source_line: None,
            target_line: Some(line),
            source_text: None,
            target_text: Some(text.to_string()),
            description: format!("line {} only in target: {:?}", line, text),
        }
    }

    pub fn status_codes(source: u16, target: u16) -> Self {
        Self {
            kind: TextDiffKind::StatusCodeDifference,
            source_line: None,
            target_line: None,
            source_text: Some(source.to_string()),
            target_text: Some(target.to_string()),
            description: format!("status code {} != {}", source, target),
        }
    }
}
