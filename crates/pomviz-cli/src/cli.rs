//! CLI argument definitions for pomviz.
//!
//! Every resolution and output setting can come from a config file, an
//! environment variable, or a flag; flags and environment variables win over
//! the file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pomviz_core::config::GraphConfig;

#[derive(Parser, Debug)]
#[command(
    name = "pomviz",
    version,
    about = "Visualize the transitive dependency graph of a Maven package",
    long_about = "pomviz walks a package's POM, its parent POMs and imported BOMs in a Maven \
                  repository, builds the transitive dependency graph to a bounded depth, and \
                  writes it as Graphviz DOT (optionally rendered to an image)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the dependency graph, write <output>.dot and render it
    Graph {
        #[command(flatten)]
        resolve: ResolveArgs,
        /// Output path without extension
        #[arg(short, long, env = "POMVIZ_OUTPUT")]
        output: Option<PathBuf>,
        /// Graphviz `dot` executable
        #[arg(long, env = "POMVIZ_GRAPHVIZ")]
        graphviz: Option<PathBuf>,
        /// Image format passed to Graphviz (png, svg, pdf, ...)
        #[arg(short, long, env = "POMVIZ_FORMAT")]
        format: Option<String>,
        /// Only write the DOT file
        #[arg(long)]
        dot_only: bool,
    },

    /// Print the dependency tree
    Tree {
        #[command(flatten)]
        resolve: ResolveArgs,
        /// Maximum depth to display
        #[arg(long)]
        depth: Option<usize>,
        /// Explain why a dependency is included
        #[arg(long)]
        why: Option<String>,
    },
}

/// Settings shared by every command that builds a graph.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Config file (`.json` for JSON, anything else is read as TOML)
    #[arg(short, long, env = "POMVIZ_CONFIG")]
    pub config: Option<PathBuf>,
    /// Repository base URL or local directory
    #[arg(short, long, env = "POMVIZ_REPOSITORY")]
    pub repository: Option<String>,
    /// Root package as groupId:artifactId:version
    #[arg(short, long, env = "POMVIZ_PACKAGE")]
    pub package: Option<String>,
    /// Maximum traversal depth (the root is depth 0)
    #[arg(long, env = "POMVIZ_MAX_DEPTH")]
    pub max_depth: Option<usize>,
    /// Concurrent manifest fetches
    #[arg(short, long, env = "POMVIZ_JOBS")]
    pub jobs: Option<usize>,
}

impl ResolveArgs {
    /// Read the config file, if any, and apply `overrides` plus these flags on top.
    pub fn load(&self, overrides: GraphConfig) -> miette::Result<GraphConfig> {
        let base = match &self.config {
            Some(path) => GraphConfig::from_path(path)?,
            None => GraphConfig::default(),
        };
        let flags = GraphConfig {
            repository_url: self.repository.clone(),
            package_name: self.package.clone(),
            max_depth: self.max_depth,
            jobs: self.jobs,
            ..overrides
        };
        Ok(base.merge(flags))
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
