//! Handler for `pomviz graph`.

use std::path::PathBuf;

use miette::Result;

use pomviz_core::config::GraphConfig;
use pomviz_ops::ops_graph::{self, GraphOptions};

use crate::cli::ResolveArgs;

pub async fn exec(
    resolve: &ResolveArgs,
    output: Option<PathBuf>,
    graphviz: Option<PathBuf>,
    format: Option<String>,
    dot_only: bool,
) -> Result<()> {
    let config = resolve.load(GraphConfig {
        output_file_path: output,
        graphviz_program_path: graphviz,
        format,
        ..Default::default()
    })?;

    let outcome = ops_graph::graph(&config, &GraphOptions { dot_only }).await?;
    tracing::info!(
        "{} edge(s) written to {}",
        outcome.edge_count,
        outcome.dot_path.display()
    );
    Ok(())
}
