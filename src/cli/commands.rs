//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - load: load built images into kind cluster nodes
//! - inventory: list images already cached on the nodes
//! - detect: print the kind cluster behind a kube context

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kindload - push freshly built images into a kind cluster
#[derive(Parser, Debug)]
#[command(name = "kindload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load images built by this run into every node of a kind cluster
    Load {
        /// Build output file: {"builds":[{"imageName":..,"tag":..}]}
        #[arg(short, long)]
        artifacts: PathBuf,

        /// Build output file listing only the images this run built
        #[arg(long)]
        built_tags: Option<PathBuf>,

        /// Tag built by this run (repeatable)
        #[arg(long = "built")]
        built: Vec<String>,

        /// kind cluster name (detected from the kube context by default)
        #[arg(long)]
        cluster: Option<String>,

        /// Kube context to inspect
        #[arg(long)]
        kube_context: Option<String>,
    },

    /// List images already cached on the cluster nodes
    Inventory {
        /// Kube context to inspect
        #[arg(long)]
        kube_context: Option<String>,
    },

    /// Print the kind cluster name for a kube context
    Detect {
        /// Kube context to inspect (current context by default)
        #[arg(long)]
        kube_context: Option<String>,
    },
}
