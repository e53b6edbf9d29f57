//! In-memory diagram state and its initial loading.

pub mod loader;
mod store;

pub use loader::{DEFAULT_GRAPH, LoadError, SeedGraph};
pub use store::{Edge, EdgeId, GraphError, GraphStore, NODE_COLOR, Node, NodeId, Position};
