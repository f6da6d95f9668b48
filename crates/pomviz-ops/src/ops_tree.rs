//! Operation: display the dependency tree.

use pomviz_core::config::GraphConfig;
use pomviz_resolver::tree::DependencyTree;
use pomviz_util::errors::PomvizError;

/// Options for `pomviz tree`.
#[derive(Debug, Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show the path from the root to this package instead of the tree.
    pub why: Option<String>,
}

/// Build the graph for the configured package and render it as text.
///
/// Fails only when the root manifest itself could not be resolved; a
/// package without dependencies prints as a single line.
pub async fn tree(config: &GraphConfig, opts: &TreeOptions) -> miette::Result<String> {
    let settings = config.validate_resolve()?;
    let graph = crate::build_graph(&settings).await?;

    if graph.stats().expanded == 0 {
        return Err(PomvizError::EmptyGraph {
            root: settings.root.to_string(),
        }
        .into());
    }

    let tree = DependencyTree::from_edges(&settings.root.key(), graph.edges());

    if let Some(target) = &opts.why {
        let Some(path) = tree.find_path(target) else {
            return Ok(format!("Dependency '{target}' not found in the graph.\n"));
        };
        let mut output = format!("Path to {target}:\n");
        for (i, key) in path.iter().enumerate() {
            output.push_str(&format!("{}{key}\n", "  ".repeat(i)));
        }
        return Ok(output);
    }

    Ok(tree.print_tree(opts.depth))
}
