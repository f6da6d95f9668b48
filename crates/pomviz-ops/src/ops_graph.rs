//! Operation: build the dependency graph, write it as DOT, and render it.

use std::path::{Path, PathBuf};

use pomviz_core::config::GraphConfig;
use pomviz_resolver::dot;
use pomviz_resolver::graph::{BuildStats, EdgeSet};
use pomviz_util::errors::PomvizError;
use pomviz_util::fs::ensure_parent_dir;
use pomviz_util::process::CommandBuilder;
use pomviz_util::progress;

/// Options for `pomviz graph`.
#[derive(Debug, Default)]
pub struct GraphOptions {
    /// Write the DOT file only; do not run the renderer.
    pub dot_only: bool,
}

/// Files produced by a graph run.
#[derive(Debug)]
pub struct GraphOutcome {
    pub dot_path: PathBuf,
    /// `None` with `dot_only`.
    pub image_path: Option<PathBuf>,
    pub edge_count: usize,
    pub stats: BuildStats,
}

/// Build the graph for the configured package and write `<output>.dot`, then
/// render `<output>.<format>` unless `dot_only` is set.
///
/// Configuration is validated before anything is fetched. A run that yields
/// no edges is an error and writes nothing.
pub async fn graph(config: &GraphConfig, opts: &GraphOptions) -> miette::Result<GraphOutcome> {
    let settings = config.validate_render(!opts.dot_only)?;
    let graph = crate::build_graph(&settings.resolve).await?;

    if graph.is_empty() {
        return Err(PomvizError::EmptyGraph {
            root: settings.resolve.root.to_string(),
        }
        .into());
    }

    let dot_path = settings.dot_path();
    write_dot(&dot_path, graph.edges())?;
    progress::status("Wrote", &dot_path.display().to_string());

    let image_path = if opts.dot_only {
        None
    } else {
        let image_path = settings.image_path();
        render(&settings.graphviz, &settings.format, &dot_path, &image_path)?;
        progress::status("Rendered", &image_path.display().to_string());
        Some(image_path)
    };

    Ok(GraphOutcome {
        dot_path,
        image_path,
        edge_count: graph.edges().len(),
        stats: graph.stats(),
    })
}

/// Write the DOT text for `edges` to `path`, creating parent directories.
pub fn write_dot(path: &Path, edges: &EdgeSet) -> miette::Result<()> {
    ensure_parent_dir(path).map_err(PomvizError::Io)?;
    std::fs::write(path, dot::emit(edges)).map_err(|e| PomvizError::Generic {
        message: format!("Failed to write {}: {e}", path.display()),
    })?;
    Ok(())
}

/// Run `<program> -T<format> <dot> -o <image>`.
pub fn render(program: &Path, format: &str, dot: &Path, image: &Path) -> miette::Result<()> {
    let cmd = CommandBuilder::new(program)
        .arg(format!("-T{format}"))
        .arg(dot)
        .args([Path::new("-o"), image]);

    let output = cmd.exec().map_err(|e| PomvizError::Render {
        message: format!("could not run `{}`: {e}", cmd.command_line()),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PomvizError::Render {
            message: format!(
                "`{}` exited with {}: {}",
                cmd.command_line(),
                output.status,
                stderr.trim()
            ),
        }
        .into());
    }
    Ok(())
}
