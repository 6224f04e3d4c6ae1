use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{NsdocError, Result};

/// Fixed location of the diagnostic copy of the collected tree
pub const DEFAULT_DEBUG_OUTPUT: &str = "target/nsdoc-debug.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Snapshot loading configuration (passed through to the loader)
    pub loader: LoaderConfig,

    /// Collection conventions of the introspected ecosystem
    pub collection: CollectionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Colon-separated list of root namespaces to document
    pub roots: String,

    /// Prefix stripped from full names to produce short names
    pub prefix: String,

    /// Output file for the collected tree
    pub output: PathBuf,

    /// Diagnostic copy of the collected tree
    pub debug_output: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Root directory the source paths are resolved against
    pub root_dir: PathBuf,

    /// Directories holding namespace snapshot files
    pub source_paths: Vec<PathBuf>,

    /// Namespaces that must never be loaded
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Name prefix of factory functions generated for records and types
    pub factory_prefix: String,

    /// Base class marking a type as a record
    pub record_marker: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Unnamed Project".to_string(),
            roots: String::new(),
            prefix: String::new(),
            output: PathBuf::from("docs/index.json"),
            debug_output: PathBuf::from(DEFAULT_DEBUG_OUTPUT),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            source_paths: vec![PathBuf::from("snapshot")],
            exclude: vec![],
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            factory_prefix: "->".to_string(),
            record_marker: "clojure.lang.IRecord".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Split the colon-separated root list, ignoring empty segments
    pub fn root_list(&self) -> Vec<String> {
        split_roots(&self.roots)
    }
}

pub fn split_roots(roots: &str) -> Vec<String> {
    roots
        .split(':')
        .map(str::trim)
        .filter(|root| !root.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| NsdocError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| NsdocError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                // Try common config file locations
                let candidates = [
                    "Nsdoc.toml",
                    "nsdoc.toml",
                    ".nsdoc.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}
