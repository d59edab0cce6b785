mod load;
mod model;
mod sanitize;

pub use load::load_code_graph;
pub use model::{CodeGraph, EdgeRef, GraphNode, NodeKind, RawGraph};
pub use sanitize::sanitize_graph;
