//! Indented tree view over a built edge set.

use std::collections::{BTreeMap, HashSet};

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::graph::EdgeSet;

/// Dependency graph keyed by `group:artifact:version`, rooted at one package.
pub struct DependencyTree {
    graph: DiGraph<String, ()>,
    index: BTreeMap<String, NodeIndex>,
    root: NodeIndex,
}

impl DependencyTree {
    pub fn from_edges(root_key: &str, edges: &EdgeSet) -> Self {
        let mut tree = Self {
            graph: DiGraph::new(),
            index: BTreeMap::new(),
            root: NodeIndex::new(0),
        };
        tree.root = tree.add_node(root_key);
        for edge in edges {
            let from = tree.add_node(&edge.from);
            let to = tree.add_node(&edge.to);
            tree.graph.add_edge(from, to, ());
        }
        tree
    }

    fn add_node(&mut self, key: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let idx = self.graph.add_node(key.to_string());
        self.index.insert(key.to_string(), idx);
        idx
    }

    /// Direct dependencies of a node, sorted by key.
    fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        children.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        children.dedup();
        children
    }

    /// Render the tree below the root.
    ///
    /// A package whose dependencies were already printed elsewhere is marked
    /// `(*)` and not expanded again. With `max_depth`, nothing deeper than
    /// that many levels below the root is printed.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = format!("{}\n", self.graph[self.root]);
        let mut expanded = HashSet::new();
        expanded.insert(self.root);

        let children = self.children(self.root);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.print_subtree(
                &mut output,
                child,
                "",
                i == count - 1,
                1,
                max_depth,
                &mut expanded,
            );
        }
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        expanded: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let children = self.children(idx);
        let within_depth = max_depth.map_or(true, |max| depth < max);
        let repeated = within_depth && !children.is_empty() && expanded.contains(&idx);

        output.push_str(&format!("{prefix}{connector}{}", self.graph[idx]));
        output.push_str(if repeated { " (*)\n" } else { "\n" });
        if repeated || !within_depth {
            return;
        }
        expanded.insert(idx);

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.print_subtree(
                output,
                child,
                &child_prefix,
                i == count - 1,
                depth + 1,
                max_depth,
                expanded,
            );
        }
    }

    /// Shortest path from the root to `target`, root first.
    ///
    /// `target` may be a full `group:artifact:version` key, a
    /// `group:artifact` pair, or a bare artifact name.
    pub fn find_path(&self, target: &str) -> Option<Vec<&str>> {
        let target = self.resolve_key(target)?;
        let (_, path) = astar(&self.graph, self.root, |n| n == target, |_| 1, |_| 0)?;
        Some(path.into_iter().map(|idx| self.graph[idx].as_str()).collect())
    }

    /// Match a user-supplied key; the first match in key order wins.
    fn resolve_key(&self, key: &str) -> Option<NodeIndex> {
        if let Some(&idx) = self.index.get(key) {
            return Some(idx);
        }
        self.index
            .iter()
            .find(|(full, _)| full.rsplit_once(':').map(|(ga, _)| ga) == Some(key))
            .or_else(|| {
                self.index
                    .iter()
                    .find(|(full, _)| full.split(':').nth(1) == Some(key))
            })
            .map(|(_, &idx)| idx)
    }

    /// Number of packages reachable in the tree, excluding the root.
    pub fn len(&self) -> usize {
        self.graph.node_count().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
