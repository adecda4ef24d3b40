//! Backward engine: topological ordering and reverse-mode gradient propagation.

use log::debug;

use super::graph::{Graph, Node, NodeId};
use super::op::Op;
use crate::autograd::GraphError;

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

impl Graph {
    /// Returns every node reachable from `root`, each after all of its operands.
    ///
    /// Depth-first with an explicit stack; nodes are marked by id, so a node
    /// used by several consumers appears exactly once.
    pub fn topological_order(&self, root: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let nodes = self.nodes();
        Graph::resolve(&nodes, root)?;

        let mut marks = vec![Mark::Unvisited; nodes.len()];
        let mut order = Vec::new();
        // (node, index of the next operand to visit)
        let mut stack = vec![(root, 0usize)];
        marks[root.index()] = Mark::OnStack;

        while let Some(&(id, next)) = stack.last() {
            match nodes[id.index()].op.operand(next) {
                Some(child) => {
                    let top = stack.len() - 1;
                    stack[top].1 += 1;
                    let Some(&mark) = marks.get(child.index()) else {
                        return Err(GraphError::UnknownNode {
                            node: child,
                            len: nodes.len(),
                        });
                    };
                    match mark {
                        Mark::Unvisited => {
                            marks[child.index()] = Mark::OnStack;
                            stack.push((child, 0));
                        }
                        Mark::OnStack => return Err(GraphError::CycleDetected { node: child }),
                        Mark::Done => {}
                    }
                }
                None => {
                    marks[id.index()] = Mark::Done;
                    order.push(id);
                    stack.pop();
                }
            }
        }
        Ok(order)
    }

    /// Accumulates `d(root)/d(node)` into the gradient of every node reachable from `root`.
    ///
    /// The root's gradient is seeded to 1.0; all other gradients are added to,
    /// so calling this twice without zeroing sums the two passes. Nodes not
    /// reachable from `root` are left untouched.
    pub fn backward(&self, root: NodeId) -> Result<(), GraphError> {
        let order = self.topological_order(root)?;
        debug!("backward from {root}: {} reachable nodes", order.len());

        let mut nodes = self.nodes_mut();
        nodes[root.index()].grad = 1.0;
        for &id in order.iter().rev() {
            propagate(&mut nodes, id);
        }
        Ok(())
    }
}

/// Applies the local chain-rule step of `id` to its operands' gradients.
fn propagate(nodes: &mut [Node], id: NodeId) {
    let Node {
        op, data: out, grad: g, ..
    } = nodes[id.index()];

    match op {
        Op::Leaf => {}
        Op::Add(a, b) => {
            nodes[a.index()].grad += g;
            nodes[b.index()].grad += g;
        }
        Op::Sub(a, b) => {
            nodes[a.index()].grad += g;
            nodes[b.index()].grad -= g;
        }
        Op::Mul(a, b) => {
            let (av, bv) = (value(nodes, a), value(nodes, b));
            nodes[a.index()].grad += bv * g;
            nodes[b.index()].grad += av * g;
        }
        Op::Div(a, b) => {
            let (av, bv) = (value(nodes, a), value(nodes, b));
            nodes[a.index()].grad += (1.0 / bv) * g;
            nodes[b.index()].grad += (-av / (bv * bv)) * g;
        }
        Op::Pow(a, k) => {
            let av = value(nodes, a);
            nodes[a.index()].grad += k * av.powf(k - 1.0) * g;
        }
        Op::Tanh(a) => nodes[a.index()].grad += (1.0 - out * out) * g,
        Op::Sigmoid(a) => nodes[a.index()].grad += out * (1.0 - out) * g,
        Op::Relu(a) => nodes[a.index()].grad += if out > 0.0 { g } else { 0.0 },
        Op::Exp(a) => nodes[a.index()].grad += out * g,
    }
}

fn value(nodes: &[Node], id: NodeId) -> f64 {
    nodes[id.index()].data
}
