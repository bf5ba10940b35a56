use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::domain::pair::{PairInput, SideError, SideInput};
use crate::domain::ports::PairProvider;

/// Pairs `.json` capture files across two folder trees by relative path.
///
/// Discovery order is the sorted union of relative paths from both sides, so
/// a run over the same folders always yields the same pair sequence. A file
/// present on only one side, or unreadable/unparseable, becomes a side error
/// on its pair — never a failed run.
pub struct FsPairProvider {
    source_dir: PathBuf,
    target_dir: PathBuf,
}

impl FsPairProvider {
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
        }
    }
}

#[async_trait]
impl PairProvider for FsPairProvider {
    async fn discover(&self) -> Result<Vec<PairInput>> {
        let mut relative_paths = collect_relative(&self.source_dir)
            .with_context(|| format!("Failed to scan source folder {}", self.source_dir.display()))?;
        relative_paths.extend(
            collect_relative(&self.target_dir).with_context(|| {
                format!("Failed to scan target folder {}", self.target_dir.display())
            })?,
        );

        debug!(pairs = relative_paths.len(), "folder pairing complete");

        let pairs = relative_paths
            .into_iter()
            .map(|rel| {
                let source_path = self.source_dir.join(&rel);
                let target_path = self.target_dir.join(&rel);
                let name = Path::new(&rel)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| rel.clone());
                PairInput {
                    name,
                    relative_path: Some(rel),
                    source: load_side(&source_path),
                    target: load_side(&target_path),
                    source_path: Some(source_path),
                    target_path: Some(target_path),
                }
            })
            .collect();
        Ok(pairs)
    }
}

/// Relative paths of all `.json` files under `root`, sorted.
fn collect_relative(root: &Path) -> Result<BTreeSet<String>> {
    let mut found = BTreeSet::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                if let Ok(rel) = path.strip_prefix(root) {
                    found.insert(rel.to_string_lossy().into_owned());
                }
            }
        }
    }
    Ok(found)
}

fn load_side(path: &Path) -> SideInput {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return SideInput::failed(SideError::new(
                "MissingFile",
                format!("{} has no counterpart", path.display()),
            ));
        }
        Err(err) => {
            return SideInput::failed(SideError::new(
                "ReadError",
                format!("failed to read {}: {}", path.display(), err),
            ));
        }
    };

    match serde_json::from_str(&raw) {
        Ok(body) => SideInput {
            status: None,
            body: Some(body),
            raw: Some(raw),
            error: None,
        },
        Err(err) => SideInput {
            status: None,
            body: None,
            raw: Some(raw),
            error: Some(SideError::new(
                "DeserializationError",
                format!("{} is not valid JSON: {}", path.display(), err),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn pairs_files_by_relative_path_in_sorted_order() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write(source.path(), "b.json", "{}");
        write(source.path(), "sub/a.json", r#"{"v": 1}"#);
        write(target.path(), "b.json", "{}");
        write(target.path(), "sub/a.json", r#"{"v": 2}"#);

        let provider = FsPairProvider::new(source.path(), target.path());
        let pairs = provider.discover().await.unwrap();

        let rels: Vec<&str> = pairs
            .iter()
            .map(|p| p.relative_path.as_deref().unwrap())
            .collect();
        assert_eq!(rels, vec!["b.json", "sub/a.json"]);
        assert!(pairs.iter().all(|p| p.source.body.is_some()));
    }

    #[tokio::test]
    async fn missing_counterpart_is_a_side_error() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write(source.path(), "only_here.json", "{}");

        let provider = FsPairProvider::new(source.path(), target.path());
        let pairs = provider.discover().await.unwrap();

        assert_eq!(pairs.len(), 1);
        let error = pairs[0].target.error.as_ref().unwrap();
        assert_eq!(error.kind, "MissingFile");
        assert!(pairs[0].source.body.is_some());
    }

    #[tokio::test]
    async fn invalid_json_keeps_raw_text_for_fallback() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write(source.path(), "x.json", "{broken");
        write(target.path(), "x.json", "{}");

        let provider = FsPairProvider::new(source.path(), target.path());
        let pairs = provider.discover().await.unwrap();

        let side = &pairs[0].source;
        assert_eq!(side.error.as_ref().unwrap().kind, "DeserializationError");
        assert_eq!(side.raw.as_deref(), Some("{broken"));
    }

    #[tokio::test]
    async fn non_json_files_are_ignored() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write(source.path(), "notes.txt", "skip me");
        write(source.path(), "keep.json", "{}");
        write(target.path(), "keep.json", "{}");

        let provider = FsPairProvider::new(source.path(), target.path());
        let pairs = provider.discover().await.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].name, "keep.json");
    }
}
