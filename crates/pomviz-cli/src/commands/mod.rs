//! Command dispatch and handler modules.

mod graph;
mod tree;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Graph {
            resolve,
            output,
            graphviz,
            format,
            dot_only,
        } => graph::exec(&resolve, output, graphviz, format, dot_only).await,
        Command::Tree {
            resolve,
            depth,
            why,
        } => tree::exec(&resolve, depth, why).await,
    }
}
