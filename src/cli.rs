use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::core::Engine;

#[derive(Parser)]
#[command(name = "nsdoc")]
#[command(about = "Collects a documentation tree from loaded namespaces")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Target directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Collect the documentation tree and write it out
    Collect {
        /// Colon-separated root namespaces
        #[arg(short, long)]
        roots: Option<String>,

        /// Prefix stripped from namespace names to form short names
        #[arg(short, long)]
        prefix: Option<String>,

        /// Output file for the collected tree
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the inferred base namespaces and their subspaces
    Bases {
        /// Colon-separated root namespaces
        #[arg(short, long)]
        roots: Option<String>,
    },
}

impl Cli {
    pub async fn execute(self, mut engine: Engine) -> Result<()> {
        match self.command {
            Commands::Init { path } => {
                engine.init(path).await
            }
            Commands::Collect { roots, prefix, output } => {
                engine.collect(roots, prefix, output).await
            }
            Commands::Bases { roots } => {
                engine.bases(roots).await
            }
        }
    }
}
