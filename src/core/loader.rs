// src/core/loader.rs
use std::path::{Path, PathBuf};
use serde::Deserialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LoaderConfig;
use crate::error::{NsdocError, Result};
use super::registry::{ClassInfo, Namespace, Registry};

/// Anything that can bring namespaces into a registry snapshot
pub trait RegistryLoader {
    /// Load every namespace the loader knows about
    fn load(&self) -> Result<Registry>;

    /// Get the loader name
    fn loader_name(&self) -> &str;
}

/// On-disk dump of one loaded namespace and the classes it defines
#[derive(Debug, Deserialize)]
struct NamespaceSnapshot {
    #[serde(flatten)]
    namespace: Namespace,

    #[serde(default)]
    classes: Vec<ClassInfo>,

    /// Set by the dumping process when the namespace failed to load
    #[serde(default)]
    load_error: Option<String>,
}

/// Loads `*.json` namespace snapshots from the configured source paths
pub struct SnapshotLoader {
    config: LoaderConfig,
}

impl SnapshotLoader {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Snapshot files under every source path, in deterministic load order
    fn snapshot_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for source in &self.config.source_paths {
            let dir = self.config.root_dir.join(source);
            if !dir.is_dir() {
                return Err(NsdocError::Loader(format!(
                    "Source path {} is not a directory",
                    dir.display()
                )));
            }

            let walker = WalkDir::new(&dir).sort_by_file_name();
            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("⚠️ Cannot read entry under {}: {}", dir.display(), e);
                        continue;
                    }
                };

                let path = entry.path();
                if entry.file_type().is_file() && is_snapshot_file(path) {
                    files.push(path.to_path_buf());
                }
            }
        }

        Ok(files)
    }

    fn read_snapshot(&self, path: &Path) -> Result<NamespaceSnapshot> {
        let content = std::fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.config.exclude.iter().any(|excluded| excluded == name)
    }
}

impl RegistryLoader for SnapshotLoader {
    fn load(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        let mut failures = 0usize;

        for path in self.snapshot_files()? {
            let snapshot = match self.read_snapshot(&path) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("⚠️ Failed to load snapshot {}: {}", path.display(), e);
                    failures += 1;
                    continue;
                }
            };

            let name = snapshot.namespace.name.clone();

            if self.is_excluded(&name) {
                info!("Excluding namespace {}", name);
                continue;
            }

            if let Some(error) = snapshot.load_error {
                warn!("⚠️ Namespace {} failed to load: {}", name, error);
                failures += 1;
                continue;
            }

            for class in snapshot.classes {
                registry.insert_class(class);
            }

            if registry.insert_namespace(snapshot.namespace) {
                debug!("Loaded namespace {} from {}", name, path.display());
            } else {
                warn!("⚠️ Namespace {} loaded twice; keeping the first copy", name);
            }
        }

        info!(
            "Loaded {} namespaces and {} classes ({} failures)",
            registry.namespace_count(),
            registry.class_count(),
            failures
        );

        Ok(registry)
    }

    fn loader_name(&self) -> &str {
        "snapshot"
    }
}

fn is_snapshot_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("json")
}
