//! Arena of scalar nodes and the primitive graph-building operations.

use std::cell::{Cell, RefCell};
use std::fmt;

use super::op::Op;
use super::var::Var;
use crate::autograd::GraphError;

/// Stable handle to a node inside a [`Graph`].
///
/// An arena slot plus the serial of the node created in it. A slot reused
/// after [`Graph::truncate`] holds a node with a different serial, so an id
/// of a discarded node never resolves to its replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    serial: u64,
}

impl NodeId {
    pub(crate) fn new(index: usize, serial: u64) -> Self {
        NodeId { index, serial }
    }

    /// Position of the node in its arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// A single scalar vertex: forward value, accumulated gradient, producing op.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) data: f64,
    pub(crate) grad: f64,
    pub(crate) op: Op,
    serial: u64,
    name: Option<String>,
}

impl Node {
    /// Forward value.
    #[must_use]
    pub fn data(&self) -> f64 {
        self.data
    }

    /// Accumulated gradient.
    #[must_use]
    pub fn grad(&self) -> f64 {
        self.grad
    }

    #[must_use]
    pub fn op(&self) -> Op {
        self.op
    }

    /// Diagnostic label: the given name, or `e_<serial>` for anonymous nodes.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("e_{}", self.serial),
        }
    }
}

/// Append-only arena holding every node of a computation.
///
/// Builder methods take `&self` and append through a `RefCell`, so many
/// [`Var`] handles can share one graph while an expression is being written.
/// Parameters created up front survive [`Graph::truncate`], which discards
/// the per-step expression nodes built after them.
#[derive(Debug)]
pub struct Graph {
    nodes: RefCell<Vec<Node>>,
    next_serial: Cell<u64>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(Vec::new()),
            next_serial: Cell::new(1),
        }
    }

    /// Number of nodes currently in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every node at index `mark` or later.
    ///
    /// Use `let mark = graph.len()` before building a throwaway expression and
    /// `graph.truncate(mark)` once its gradients have been consumed. Ids of the
    /// dropped nodes stay invalid even after new nodes fill their slots.
    /// Label serials keep counting.
    pub fn truncate(&self, mark: usize) {
        self.nodes.borrow_mut().truncate(mark);
    }

    /// Creates an anonymous leaf (input or parameter) with zero gradient.
    pub fn leaf(&self, data: f64) -> Var<'_> {
        let id = self.push(data, Op::Leaf, None);
        Var::new(self, id)
    }

    /// Creates a leaf carrying a diagnostic name (e.g. `w[0,1,2]`).
    pub fn leaf_named(&self, data: f64, name: impl Into<String>) -> Var<'_> {
        let id = self.push(data, Op::Leaf, Some(name.into()));
        Var::new(self, id)
    }

    /// Lifts a literal into a fresh leaf labelled with its value.
    pub fn constant(&self, data: f64) -> NodeId {
        self.push(data, Op::Leaf, Some(format!("{data}")))
    }

    /// Wraps an existing id in a [`Var`] handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not address a node of this graph.
    #[must_use]
    pub fn var(&self, id: NodeId) -> Var<'_> {
        self.check(id);
        Var::new(self, id)
    }

    /// Returns a snapshot of a node, or `None` if the id is not in the arena.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<Node> {
        self.nodes
            .borrow()
            .get(id.index)
            .filter(|node| node.serial == id.serial)
            .cloned()
    }

    /// Forward value of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not address a node of this graph.
    #[must_use]
    pub fn data(&self, id: NodeId) -> f64 {
        self.check(id);
        self.nodes.borrow()[id.index].data
    }

    /// Accumulated gradient of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not address a node of this graph.
    #[must_use]
    pub fn grad(&self, id: NodeId) -> f64 {
        self.check(id);
        self.nodes.borrow()[id.index].grad
    }

    /// Resets the gradient of `id` to zero.
    pub fn zero_grad(&self, id: NodeId) -> Result<(), GraphError> {
        self.with_node_mut(id, |node| node.grad = 0.0)
    }

    /// Replaces the value of a leaf (the optimizer's parameter update).
    ///
    /// Computed nodes keep the value they were built with.
    pub fn set_data(&self, id: NodeId, data: f64) -> Result<(), GraphError> {
        let op = self.with_node_mut(id, |node| node.op)?;
        if !op.is_leaf() {
            return Err(GraphError::NotALeaf {
                node: id,
                op: op.name(),
            });
        }
        self.with_node_mut(id, |node| node.data = data)
    }

    /// Sets the diagnostic name of `id`. Has no effect on values or gradients.
    pub fn set_name(&self, id: NodeId, name: impl Into<String>) -> Result<(), GraphError> {
        let name = name.into();
        self.with_node_mut(id, |node| node.name = Some(name))
    }

    /// Diagnostic label of `id` (see [`Node::label`]).
    ///
    /// # Panics
    ///
    /// Panics if `id` does not address a node of this graph.
    #[must_use]
    pub fn label(&self, id: NodeId) -> String {
        self.check(id);
        self.nodes.borrow()[id.index].label()
    }

    /// The op of `id` written over its operands' labels, e.g. `(w[0,0,0]*e_3)`
    /// or `tanh(e_7)`. Leaves render as their label.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not address a node of this graph.
    #[must_use]
    pub fn expression(&self, id: NodeId) -> String {
        self.check(id);
        let nodes = self.nodes.borrow();
        let node = &nodes[id.index];
        let label = |operand: NodeId| {
            nodes
                .get(operand.index)
                .map_or_else(|| operand.to_string(), Node::label)
        };
        let symbol = node.op.symbol();
        match node.op {
            Op::Leaf => node.label(),
            Op::Add(a, b) | Op::Sub(a, b) | Op::Mul(a, b) | Op::Div(a, b) => {
                format!("({}{symbol}{})", label(a), label(b))
            }
            Op::Pow(a, k) => format!("({}{symbol}{k})", label(a)),
            Op::Tanh(a) | Op::Sigmoid(a) | Op::Relu(a) | Op::Exp(a) => {
                format!("{symbol}({})", label(a))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Primitives: eager forward value + one new node tagged with its op
    // -------------------------------------------------------------------------

    pub fn add(&self, a: NodeId, b: NodeId) -> NodeId {
        let data = self.data(a) + self.data(b);
        self.push(data, Op::Add(a, b), None)
    }

    pub fn sub(&self, a: NodeId, b: NodeId) -> NodeId {
        let data = self.data(a) - self.data(b);
        self.push(data, Op::Sub(a, b), None)
    }

    pub fn mul(&self, a: NodeId, b: NodeId) -> NodeId {
        let data = self.data(a) * self.data(b);
        self.push(data, Op::Mul(a, b), None)
    }

    /// `a / b`. A zero-valued `b` yields an infinite or NaN value, not an error.
    pub fn div(&self, a: NodeId, b: NodeId) -> NodeId {
        let data = self.data(a) / self.data(b);
        self.push(data, Op::Div(a, b), None)
    }

    /// `a^k` for a constant exponent `k`.
    pub fn powf(&self, a: NodeId, k: f64) -> NodeId {
        let data = self.data(a).powf(k);
        self.push(data, Op::Pow(a, k), None)
    }

    pub fn tanh(&self, a: NodeId) -> NodeId {
        let data = self.data(a).tanh();
        self.push(data, Op::Tanh(a), None)
    }

    pub fn sigmoid(&self, a: NodeId) -> NodeId {
        let data = 1.0 / (1.0 + (-self.data(a)).exp());
        self.push(data, Op::Sigmoid(a), None)
    }

    pub fn relu(&self, a: NodeId) -> NodeId {
        let data = self.data(a).max(0.0);
        self.push(data, Op::Relu(a), None)
    }

    pub fn exp(&self, a: NodeId) -> NodeId {
        let data = self.data(a).exp();
        self.push(data, Op::Exp(a), None)
    }

    /// Negation, built as multiplication by a lifted `-1`.
    pub fn neg(&self, a: NodeId) -> NodeId {
        let minus_one = self.constant(-1.0);
        self.mul(a, minus_one)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn push(&self, data: f64, op: Op, name: Option<String>) -> NodeId {
        let serial = self.next_serial.get();
        self.next_serial.set(serial + 1);
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId::new(nodes.len(), serial);
        nodes.push(Node {
            data,
            grad: 0.0,
            op,
            serial,
            name,
        });
        id
    }

    /// Fails unless `id` addresses a live node of `nodes`.
    pub(crate) fn resolve(nodes: &[Node], id: NodeId) -> Result<(), GraphError> {
        match nodes.get(id.index) {
            Some(node) if node.serial == id.serial => Ok(()),
            _ => Err(GraphError::UnknownNode {
                node: id,
                len: nodes.len(),
            }),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` is stale or belongs to another graph.
    pub(crate) fn check(&self, id: NodeId) {
        if let Err(err) = Self::resolve(&self.nodes.borrow(), id) {
            panic!("{err}");
        }
    }

    fn with_node_mut<R>(&self, id: NodeId, f: impl FnOnce(&mut Node) -> R) -> Result<R, GraphError> {
        let mut nodes = self.nodes.borrow_mut();
        Self::resolve(&nodes, id)?;
        Ok(f(&mut nodes[id.index]))
    }

    pub(crate) fn nodes(&self) -> std::cell::Ref<'_, Vec<Node>> {
        self.nodes.borrow()
    }

    pub(crate) fn nodes_mut(&self) -> std::cell::RefMut<'_, Vec<Node>> {
        self.nodes.borrow_mut()
    }
}
