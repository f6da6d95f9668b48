//! Handler for `pomviz tree`.

use miette::Result;

use pomviz_core::config::GraphConfig;
use pomviz_ops::ops_tree::{self, TreeOptions};

use crate::cli::ResolveArgs;

pub async fn exec(resolve: &ResolveArgs, depth: Option<usize>, why: Option<String>) -> Result<()> {
    let config = resolve.load(GraphConfig::default())?;
    let opts = TreeOptions { depth, why };
    let output = ops_tree::tree(&config, &opts).await?;
    print!("{output}");
    Ok(())
}
