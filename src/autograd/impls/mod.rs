//! Graph arena, operation tags, the `Var` handle and the backward engine.

mod backward;
pub mod graph;
pub mod op;
pub mod var;
