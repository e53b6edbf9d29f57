use leptos::prelude::*;
use log::warn;

use super::state::Selection;
use crate::graph::{EdgeId, GraphStore, Node, NodeId, Position};

/// Handle through which the view reads and mutates the graph.
///
/// Each method is one signal update, so observers only ever see the store
/// before or after a whole operation.
#[derive(Clone, Copy)]
pub struct GraphCommands {
	store: RwSignal<GraphStore>,
}

impl GraphCommands {
	/// Wrap `store` in a signal owned by the current reactive owner.
	pub fn new(store: GraphStore) -> Self {
		Self {
			store: RwSignal::new(store),
		}
	}

	/// Reactive read access.
	pub fn with<T>(&self, f: impl FnOnce(&GraphStore) -> T) -> T {
		self.store.with(f)
	}

	/// Read without subscribing.
	pub fn with_untracked<T>(&self, f: impl FnOnce(&GraphStore) -> T) -> T {
		self.store.with_untracked(f)
	}

	/// Read without subscribing; `None` once the owning component is gone.
	pub fn try_with_untracked<T>(&self, f: impl FnOnce(&GraphStore) -> T) -> Option<T> {
		self.store.try_with_untracked(f)
	}

	/// Reactive snapshot of one node.
	pub fn node(&self, id: NodeId) -> Option<Node> {
		self.store.with(|s| s.node(id).cloned())
	}

	/// See [`GraphStore::add_node`].
	pub fn add_node(&self, label: impl Into<String>, position: Position) -> Option<NodeId> {
		let label = label.into();
		self.store.try_update(|s| s.add_node(label, position))
	}

	/// Add a node labelled with the next free number.
	pub fn add_numbered_node(&self, position: Position) -> Option<NodeId> {
		self.store.try_update(|s| {
			let label = s.next_label();
			s.add_node(label, position)
		})
	}

	/// Remove a node and its edges in one update.
	pub fn remove_node(&self, id: NodeId) {
		self.store.update(|s| s.remove_node(id));
	}

	/// See [`GraphStore::rename_node`].
	pub fn rename_node(&self, id: NodeId, label: String) {
		self.store.update(|s| s.rename_node(id, label));
	}

	/// See [`GraphStore::move_node`].
	pub fn move_node(&self, id: NodeId, position: Position) {
		self.store.update(|s| s.move_node(id, position));
	}

	/// Connect two nodes; a rejected connection is logged and yields `None`.
	pub fn connect(&self, source: NodeId, target: NodeId) -> Option<EdgeId> {
		match self.store.try_update(|s| s.connect(source, target))? {
			Ok(id) => Some(id),
			Err(err) => {
				warn!("connect {source}->{target} rejected: {err}");
				None
			}
		}
	}

	/// See [`GraphStore::remove_edge`].
	pub fn remove_edge(&self, id: EdgeId) {
		self.store.update(|s| s.remove_edge(id));
	}

	/// Delete whatever is selected; a node takes its edges with it.
	pub fn remove_selection(&self, selection: Selection) {
		match selection {
			Selection::Node(id) => self.remove_node(id),
			Selection::Edge(id) => self.remove_edge(id),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::DEFAULT_GRAPH;

	#[test]
	fn reads_stop_after_owner_is_dropped() {
		let owner = Owner::new();
		let commands = owner.with(|| GraphCommands::new(DEFAULT_GRAPH.to_store()));
		assert_eq!(commands.try_with_untracked(|s| s.nodes().len()), Some(3));
		drop(owner);
		assert_eq!(commands.try_with_untracked(|s| s.nodes().len()), None);
	}

	#[test]
	fn removing_selected_node_drops_its_edges() {
		let owner = Owner::new();
		let commands = owner.with(|| GraphCommands::new(DEFAULT_GRAPH.to_store()));
		commands.remove_selection(Selection::Node(NodeId(2)));
		commands.with_untracked(|s| {
			assert!(s.node(NodeId(2)).is_none());
			assert!(s.edges().is_empty());
		});

		let owner = Owner::new();
		let commands = owner.with(|| GraphCommands::new(DEFAULT_GRAPH.to_store()));
		let edge = commands.with_untracked(|s| s.edge_between(NodeId(1), NodeId(2)).map(|e| e.id));
		commands.remove_selection(Selection::Edge(edge.unwrap()));
		commands.with_untracked(|s| {
			assert_eq!(s.nodes().len(), 3);
			assert_eq!(s.edges().len(), 1);
		});
	}
}
