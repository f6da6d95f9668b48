//! Graphviz DOT rendering of an edge set.

use std::fmt::Write;

use crate::graph::EdgeSet;

/// Render `edges` as a `digraph`, one statement per edge in set order.
pub fn emit(edges: &EdgeSet) -> String {
    let mut out = String::from("digraph dependencies {\n");
    for edge in edges {
        let _ = writeln!(out, "    \"{}\" -> \"{}\";", label(&edge.from), label(&edge.to));
    }
    out.push_str("}\n");
    out
}

/// Node label for a `group:artifact:version` key: one coordinate part per
/// line, safe inside a double-quoted DOT string.
pub fn label(key: &str) -> String {
    key.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(':', "\\n")
}
