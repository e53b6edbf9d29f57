use std::fmt;

use log::{debug, warn};
use thiserror::Error;

/// Color every node card is drawn with.
pub const NODE_COLOR: &str = "#ff6b6b";

/// Stable node identifier. Never reused after the node is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Stable edge identifier, independent of the edge's endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "e{}", self.0)
	}
}

/// Top-left corner of a node card, in graph coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	/// Horizontal offset, growing right.
	pub x: f64,
	/// Vertical offset, growing down.
	pub y: f64,
}

impl Position {
	/// Position at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A labelled, positioned vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Immutable after creation.
	pub id: NodeId,
	/// Display text, may be empty.
	pub label: String,
	/// Updated by dragging.
	pub position: Position,
	/// CSS color of the label.
	pub color: String,
}

/// A directed connection between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Assigned on creation.
	pub id: EdgeId,
	/// Node the edge leaves from.
	pub source: NodeId,
	/// Node the edge points at.
	pub target: NodeId,
	/// Drawn with a flowing dash.
	pub animated: bool,
}

/// Rejected graph mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
	/// An edge endpoint names a node that is not in the store.
	#[error("node {0} does not exist")]
	UnknownNode(NodeId),
}

/// Authoritative node and edge collections.
///
/// Every mutation is a single `&mut self` call, so a removal and the edges it
/// cascades to are never observable apart.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphStore {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	next_node: u32,
	next_edge: u32,
}

impl Default for GraphStore {
	fn default() -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			next_node: 1,
			next_edge: 1,
		}
	}
}

impl GraphStore {
	/// Empty store; the first node gets id 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a store from pre-identified nodes and `(source, target, animated)` triples.
	///
	/// Nodes with a duplicate id, edges with a missing endpoint and repeated
	/// endpoint pairs are dropped.
	pub fn from_parts(
		nodes: impl IntoIterator<Item = Node>,
		edges: impl IntoIterator<Item = (NodeId, NodeId, bool)>,
	) -> Self {
		let mut store = Self::new();
		for node in nodes {
			if store.node(node.id).is_some() {
				warn!("dropping node with duplicate id {}", node.id);
				continue;
			}
			store.next_node = store.next_node.max(node.id.0 + 1);
			store.nodes.push(node);
		}
		for (source, target, animated) in edges {
			if store.edge_between(source, target).is_some() {
				warn!("dropping duplicate edge {source}->{target}");
				continue;
			}
			if let Err(err) = store.add_edge(source, target, animated) {
				warn!("dropping edge {source}->{target}: {err}");
			}
		}
		store
	}

	/// Nodes in insertion order, which is also paint order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// All edges in insertion order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Node with the given id, if present.
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Edge with the given id, if present.
	pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.iter().find(|e| e.id == id)
	}

	/// Edge from `source` to `target`, if the pair is connected.
	pub fn edge_between(&self, source: NodeId, target: NodeId) -> Option<&Edge> {
		self.edges
			.iter()
			.find(|e| e.source == source && e.target == target)
	}

	/// True when the store holds no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Label the Add Node control gives the next node.
	pub fn next_label(&self) -> String {
		format!("Node {}", self.next_node)
	}

	/// Add a node under a fresh id and return it.
	pub fn add_node(&mut self, label: impl Into<String>, position: Position) -> NodeId {
		let id = NodeId(self.next_node);
		self.next_node += 1;
		let label = label.into();
		debug!("add node {id} {label:?} at ({}, {})", position.x, position.y);
		self.nodes.push(Node {
			id,
			label,
			position,
			color: NODE_COLOR.into(),
		});
		id
	}

	/// Remove a node together with every edge touching it. Unknown ids are ignored.
	pub fn remove_node(&mut self, id: NodeId) {
		let before = self.nodes.len();
		self.nodes.retain(|n| n.id != id);
		if self.nodes.len() == before {
			return;
		}
		self.edges.retain(|e| e.source != id && e.target != id);
		debug!("removed node {id}, {} edges remain", self.edges.len());
	}

	/// Replace a node's label. Unknown ids are ignored.
	pub fn rename_node(&mut self, id: NodeId, label: impl Into<String>) {
		if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
			node.label = label.into();
			debug!("renamed node {id} to {:?}", node.label);
		}
	}

	/// Store a dragged node's new position. Unknown ids are ignored.
	pub fn move_node(&mut self, id: NodeId, position: Position) {
		if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
			node.position = position;
		}
	}

	/// Add an edge between two existing nodes.
	///
	/// Connecting a pair that is already connected returns the existing edge.
	pub fn add_edge(
		&mut self,
		source: NodeId,
		target: NodeId,
		animated: bool,
	) -> Result<EdgeId, GraphError> {
		for id in [source, target] {
			if self.node(id).is_none() {
				return Err(GraphError::UnknownNode(id));
			}
		}
		if let Some(existing) = self.edge_between(source, target) {
			return Ok(existing.id);
		}
		let id = EdgeId(self.next_edge);
		self.next_edge += 1;
		debug!("add edge {id} {source}->{target}");
		self.edges.push(Edge {
			id,
			source,
			target,
			animated,
		});
		Ok(id)
	}

	/// An animated edge, as produced by the connect gesture.
	pub fn connect(&mut self, source: NodeId, target: NodeId) -> Result<EdgeId, GraphError> {
		self.add_edge(source, target, true)
	}

	/// Remove one edge, keeping its endpoints. Unknown ids are ignored.
	pub fn remove_edge(&mut self, id: EdgeId) {
		self.edges.retain(|e| e.id != id);
	}
}
