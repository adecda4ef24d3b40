//! Read-only graph diagnostics: reachable subgraph and Graphviz DOT text.

use std::collections::BTreeSet;

use crate::autograd::{Graph, GraphError, NodeId};

/// Nodes reachable from `root` (operands first) and the `(operand, consumer)` edges between them.
///
/// An operand used twice by the same consumer yields a single edge.
pub fn trace(graph: &Graph, root: NodeId) -> Result<(Vec<NodeId>, Vec<(NodeId, NodeId)>), GraphError> {
    let nodes = graph.topological_order(root)?;
    let mut edges = BTreeSet::new();
    for &id in &nodes {
        if let Some(node) = graph.node(id) {
            for operand in node.op().operands() {
                edges.insert((operand, id));
            }
        }
    }
    Ok((nodes, edges.into_iter().collect()))
}

/// Renders the subgraph under `root` in DOT format.
///
/// Each value is a record `label | data | grad`, where a computed value's label
/// also shows the expression that built it (`e_4 = tanh(e_3)`). Each computed
/// value gets an extra op node feeding it, and operand edges point into that
/// op node.
pub fn to_dot(graph: &Graph, root: NodeId) -> Result<String, GraphError> {
    let (nodes, edges) = trace(graph, root)?;

    let mut dot = String::from("digraph G {\n");
    dot.push_str("  rankdir=TB;\n\n");

    for &id in &nodes {
        let Some(node) = graph.node(id) else {
            continue;
        };
        let uid = id.index();
        let label = if node.op().is_leaf() {
            node.label()
        } else {
            format!("{} = {}", node.label(), graph.expression(id))
        };
        dot.push_str(&format!(
            "  n{uid} [shape=record, label=\"{{ {} | data {:.4} | grad {:.4} }}\"];\n",
            escape(&label),
            node.data(),
            node.grad()
        ));
        if !node.op().is_leaf() {
            dot.push_str(&format!(
                "  n{uid}_op [label=\"{}\"];\n  n{uid}_op -> n{uid};\n",
                escape(node.op().symbol())
            ));
        }
    }
    dot.push('\n');
    for (from, to) in edges {
        dot.push_str(&format!("  n{} -> n{}_op;\n", from.index(), to.index()));
    }
    dot.push_str("}\n");
    Ok(dot)
}

/// Escapes characters that are special inside DOT record labels.
fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '"' | '{' | '}' | '|' | '<' | '>' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
