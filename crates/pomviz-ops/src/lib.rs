pub mod ops_graph;
pub mod ops_tree;

use pomviz_core::config::ResolveSettings;
use pomviz_maven::fetch::{CachingFetcher, RepositoryFetcher};
use pomviz_resolver::graph::{DependencyGraph, GraphBuilder};
use pomviz_util::progress;

/// Traverse the configured repository from the root package, with a spinner
/// while it runs and a summary line afterwards.
pub async fn build_graph(settings: &ResolveSettings) -> miette::Result<DependencyGraph> {
    let fetcher = CachingFetcher::new(RepositoryFetcher::for_location(&settings.repository)?);

    let pb = progress::spinner(&format!("Resolving {}", settings.root));
    let graph = GraphBuilder::new(&fetcher, settings.max_depth)
        .with_jobs(settings.jobs)
        .build(&settings.root)
        .await;
    pb.finish_and_clear();
    tracing::debug!("{} distinct manifest(s) requested", fetcher.cached_len());

    let stats = graph.stats();
    if stats.missing > 0 {
        progress::status_warn(
            "Missing",
            &format!("{} package(s) not found in {}", stats.missing, settings.repository),
        );
    }
    if stats.failed > 0 {
        progress::status_warn(
            "Skipped",
            &format!("{} package(s) could not be fetched or parsed", stats.failed),
        );
    }
    progress::status_info(
        "Resolved",
        &format!(
            "{} ({} package(s), {} edge(s), depth {})",
            graph.root(),
            graph.node_count(),
            graph.edges().len(),
            settings.max_depth
        ),
    );
    Ok(graph)
}
