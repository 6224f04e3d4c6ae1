use std::path::{Path, PathBuf};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{NsdocError, Result};
use super::assembler::ModuleEntry;

/// Writes the collected tree to the diagnostic path and the requested output
pub struct OutputWriter {
    debug_path: PathBuf,
}

impl OutputWriter {
    pub fn new(debug_path: &Path) -> Self {
        Self {
            debug_path: debug_path.to_path_buf(),
        }
    }

    /// Serialize the tree once and write identical bytes to both locations.
    /// Returns the SHA256 digest of the written content.
    pub async fn write_tree(&self, tree: &[ModuleEntry], output: &Path) -> Result<String> {
        let content = render_tree(tree)?;
        let digest = calculate_hash(&content);

        write_file(&self.debug_path, &content).await?;
        info!("🪲 Debug snapshot written to {}", self.debug_path.display());

        write_file(output, &content).await?;
        info!("📝 Documentation tree written to {} (sha256 {})", output.display(), &digest[..12]);

        Ok(digest)
    }
}

/// Stable textual form of the tree
pub fn render_tree(tree: &[ModuleEntry]) -> Result<String> {
    let mut content = serde_json::to_string_pretty(tree)?;
    content.push('\n');
    Ok(content)
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            NsdocError::Output(format!("Cannot create {}: {}", parent.display(), e))
        })?;
    }

    tokio::fs::write(path, content.as_bytes()).await.map_err(|e| {
        NsdocError::Output(format!("Cannot write {}: {}", path.display(), e))
    })?;
    Ok(())
}

/// Calculate SHA256 hash of content
fn calculate_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use predicates::prelude::*;

    fn sample_tree() -> Vec<ModuleEntry> {
        vec![ModuleEntry {
            full_name: "lib.core".to_string(),
            short_name: "core".to_string(),
            doc: Some("Core functions.".to_string()),
            author: Some("Somebody".to_string()),
            see_also: None,
            added: None,
            deprecated: None,
            members: vec![],
            interfaces: vec![],
            types: vec![],
            subspaces: vec![],
            base_name: "core".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_writes_identical_content_to_both_paths() {
        let dir = TempDir::new().unwrap();
        let debug = dir.child("target/debug.json");
        let output = dir.child("docs/out/index.json");

        let writer = OutputWriter::new(debug.path());
        let digest = writer.write_tree(&sample_tree(), output.path()).await.unwrap();

        debug.assert(predicate::path::exists());
        output.assert(predicate::path::exists());
        output.assert(predicate::str::contains("\"short_name\": \"core\""));

        let debug_content = std::fs::read_to_string(debug.path()).unwrap();
        let output_content = std::fs::read_to_string(output.path()).unwrap();
        assert_eq!(debug_content, output_content);
        assert_eq!(digest, calculate_hash(&output_content));
        assert!(output_content.ends_with("]\n"));
    }

    #[tokio::test]
    async fn test_unwritable_output_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.child("blocker");
        blocker.write_str("a file, not a directory").unwrap();

        let writer = OutputWriter::new(&dir.path().join("debug.json"));
        let result = writer
            .write_tree(&sample_tree(), &blocker.path().join("index.json"))
            .await;

        assert!(matches!(result, Err(NsdocError::Output(_))));
    }

    #[test]
    fn test_rendering_is_stable() {
        let tree = sample_tree();
        assert_eq!(render_tree(&tree).unwrap(), render_tree(&tree).unwrap());
        assert!(!render_tree(&tree).unwrap().contains("see_also"));
    }
}
