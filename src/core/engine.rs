// src/core/engine.rs
use std::path::{Path, PathBuf};
use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::config::{Config, ProjectConfig};
use crate::error::NsdocError;
use super::{OutputWriter, RegistryLoader, SnapshotLoader, TreeAssembler};

/// Main orchestration engine: load snapshots, collect the tree, write it out
pub struct Engine {
    config: Config,
    loader: Box<dyn RegistryLoader>,
    writer: OutputWriter,
}

impl Engine {
    /// Create a new engine instance from a configuration file
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;

        debug!("Loaded configuration: {:?}", config);

        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        let loader = Box::new(SnapshotLoader::new(&config.loader));
        let writer = OutputWriter::new(&config.project.debug_output);

        Self {
            config,
            loader,
            writer,
        }
    }

    /// Write a default configuration file
    pub async fn init(&mut self, path: Option<PathBuf>) -> Result<()> {
        let dir = path.unwrap_or_else(|| PathBuf::from("."));
        let config_path = dir.join("nsdoc.toml");

        if config_path.exists() {
            bail!("{} already exists", config_path.display());
        }

        tokio::fs::create_dir_all(&dir).await?;
        Config::default().save(&config_path)?;
        info!("✅ Wrote default configuration to {}", config_path.display());
        Ok(())
    }

    /// Collect the documentation tree and write it to the debug and output paths
    pub async fn collect(
        &mut self,
        roots: Option<String>,
        prefix: Option<String>,
        output: Option<PathBuf>,
    ) -> Result<()> {
        let project = self.project_with(roots, prefix, output)?;

        info!("🔍 Collecting documentation for roots {}", project.roots);
        info!("Output: {}", project.output.display());

        let registry = self.loader.load()?;
        debug!("Registry loaded by {} loader", self.loader.loader_name());

        let tree = TreeAssembler::new(&registry, &project, &self.config.collection).assemble();

        self.writer.write_tree(&tree, &project.output).await?;

        info!("🎉 Documentation collection complete!");
        Ok(())
    }

    /// Print the inferred base namespaces and their subspaces
    pub async fn bases(&self, roots: Option<String>) -> Result<()> {
        let project = self.project_with(roots, None, None)?;
        let registry = self.loader.load()?;
        let assembler = TreeAssembler::new(&registry, &project, &self.config.collection);

        for line in hierarchy_lines(&assembler) {
            println!("{}", line);
        }
        Ok(())
    }

    fn project_with(
        &self,
        roots: Option<String>,
        prefix: Option<String>,
        output: Option<PathBuf>,
    ) -> Result<ProjectConfig> {
        let mut project = self.config.project.clone();
        if let Some(roots) = roots {
            project.roots = roots;
        }
        if let Some(prefix) = prefix {
            project.prefix = prefix;
        }
        if let Some(output) = output {
            project.output = output;
        }

        if project.root_list().is_empty() {
            return Err(NsdocError::Config("No root namespaces configured".to_string()).into());
        }
        Ok(project)
    }
}

/// One line per base namespace followed by its indented subspaces
fn hierarchy_lines(assembler: &TreeAssembler<'_>) -> Vec<String> {
    let resolver = assembler.resolver();
    let mut lines = Vec::new();

    for base in resolver.base_namespaces() {
        lines.push(base.name.clone());
        for subspace in resolver.subspaces(base) {
            lines.push(format!("  {}", subspace.name));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::ModuleEntry;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    fn config_for(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.project.roots = "app".to_string();
        config.project.prefix = "app.".to_string();
        config.project.output = dir.path().join("docs/index.json");
        config.project.debug_output = dir.path().join("target/debug.json");
        config.loader.root_dir = dir.path().to_path_buf();
        config
    }

    fn write_snapshots(dir: &TempDir) {
        dir.child("snapshot/app.json")
            .write_str(r#"{"name": "app", "meta": {"doc": "The app.", "author": "Dev"}}"#)
            .unwrap();
        dir.child("snapshot/app.core.json")
            .write_str(
                r#"{
                    "name": "app.core",
                    "meta": {"doc": "Core.\n    Second line."},
                    "interns": [
                        {"name": "run", "meta": {"doc": "Runs.", "arglists": [["opts"]], "line": 3}, "value": "fn"},
                        {"name": "->Job", "meta": {"doc": "Factory.", "arglists": [["id", "payload"]]}, "value": "fn"}
                    ],
                    "classes": [{"name": "app_core.Job", "bases": ["clojure.lang.IRecord"]}]
                }"#,
            )
            .unwrap();
        dir.child("snapshot/app.empty.json")
            .write_str(r#"{"name": "app.empty"}"#)
            .unwrap();
    }

    #[tokio::test]
    async fn test_collect_end_to_end() {
        let dir = TempDir::new().unwrap();
        write_snapshots(&dir);

        let mut engine = Engine::with_config(config_for(&dir));
        engine.collect(None, None, None).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("docs/index.json")).unwrap();
        let tree: Vec<ModuleEntry> = serde_json::from_str(&content).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].author.as_deref(), Some("Dev"));
        assert_eq!(tree[0].subspaces.len(), 1);

        let core = &tree[0].subspaces[0];
        assert_eq!(core.short_name, "core");
        assert_eq!(core.base_name, "app");
        assert_eq!(core.doc.as_deref(), Some("Core.\nSecond line."));
        assert_eq!(core.types[0].name, "Job");
        assert_eq!(core.types[0].fields, vec!["id", "payload"]);

        let debug = std::fs::read_to_string(dir.path().join("target/debug.json")).unwrap();
        assert_eq!(debug, content);
    }

    #[tokio::test]
    async fn test_collect_requires_roots() {
        let dir = TempDir::new().unwrap();
        write_snapshots(&dir);

        let mut config = config_for(&dir);
        config.project.roots = String::new();
        let mut engine = Engine::with_config(config);

        assert!(engine.collect(None, None, None).await.is_err());
        assert!(engine.collect(Some("app".to_string()), None, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let mut engine = Engine::with_config(Config::default());

        engine.init(Some(dir.path().to_path_buf())).await.unwrap();
        dir.child("nsdoc.toml").assert(predicates::path::exists());
        assert!(engine.init(Some(dir.path().to_path_buf())).await.is_err());
    }

    #[test]
    fn test_hierarchy_lines() {
        let dir = TempDir::new().unwrap();
        write_snapshots(&dir);
        let config = config_for(&dir);
        let registry = SnapshotLoader::new(&config.loader).load().unwrap();
        let assembler = TreeAssembler::new(&registry, &config.project, &config.collection);

        assert_eq!(hierarchy_lines(&assembler), vec!["app", "  app.core", "  app.empty"]);
    }
}
