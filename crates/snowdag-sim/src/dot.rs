//! Graphviz output for per-node DAG snapshots.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use snowdag_consensus::{Network, Node};

/// Writes one `node-<i>.dot` file per node into `dir`, creating the
/// directory if needed. Returns the written paths.
pub fn dump_network(network: &Network, dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(network.len());
    for (i, handle) in network.nodes().iter().enumerate() {
        let mut node = handle.write();
        let rendered = render_node(&mut node);
        let path = dir.join(format!("node-{i}.dot"));
        fs::write(&path, rendered)?;
        paths.push(path);
    }
    Ok(paths)
}

/// Renders one node's DAG. Edges point from child to parent; chitted
/// vertices are filled, accepted ones get a double border.
fn render_node(node: &mut Node) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph node_{} {{\n", node.index()));
    out.push_str("  rankdir=BT;\n");
    out.push_str("  node [shape=box];\n");
    for id in node.known_ids() {
        let accepted = node.is_accepted(id);
        let Some(tx) = node.transaction(id) else {
            continue;
        };
        let hex = id.to_hex();
        let mut attrs = format!("label=\"{}\\nd={} c={}\"", &hex[..8], tx.data, tx.confidence);
        if tx.chit {
            attrs.push_str(", style=filled, fillcolor=lightblue");
        }
        if accepted {
            attrs.push_str(", peripheries=2");
        }
        out.push_str(&format!("  \"{hex}\" [{attrs}];\n"));
        for parent in &tx.parents {
            out.push_str(&format!("  \"{hex}\" -> \"{}\";\n", parent.to_hex()));
        }
    }
    out.push_str("}\n");
    out
}
