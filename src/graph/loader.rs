//! Initial graph from the `nodes` query parameter.

use log::{info, warn};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use thiserror::Error;

use super::store::{GraphStore, NODE_COLOR, Node, NodeId, Position};

/// A graph description used to seed a [`GraphStore`].
///
/// Edges refer to nodes by 1-based index, which is also the id each node gets.
#[derive(Clone, Copy, Debug)]
pub struct SeedGraph<'a> {
	/// Label and position of each node, in id order.
	pub nodes: &'a [(&'a str, Position)],
	/// `(source, target)` index pairs; edges are animated.
	pub edges: &'a [(u32, u32)],
}

/// Graph shown when no usable `nodes` parameter is present.
pub const DEFAULT_GRAPH: SeedGraph<'static> = SeedGraph {
	nodes: &[
		("Node 1", Position::new(250.0, 0.0)),
		("Node 2", Position::new(100.0, 100.0)),
		("Node 3", Position::new(400.0, 200.0)),
	],
	edges: &[(1, 2), (2, 3)],
};

impl SeedGraph<'_> {
	/// Materialize the seed, dropping edges that name missing nodes.
	pub fn to_store(&self) -> GraphStore {
		let nodes = self.nodes.iter().zip(1..).map(|(&(label, position), id)| Node {
			id: NodeId(id),
			label: label.into(),
			position,
			color: NODE_COLOR.into(),
		});
		let edges = self
			.edges
			.iter()
			.map(|&(s, t)| (NodeId(s), NodeId(t), true));
		GraphStore::from_parts(nodes, edges)
	}
}

/// Why a `nodes` parameter could not be used.
#[derive(Debug, Error)]
pub enum LoadError {
	/// A `%` not followed by two hex digits.
	#[error("malformed percent escape at byte {0}")]
	Decode(usize),
	/// Decoded bytes are not UTF-8.
	#[error("decoded parameter is not valid UTF-8")]
	Utf8(#[from] std::str::Utf8Error),
	/// Not parseable as JSON.
	#[error("invalid JSON: {0}")]
	Json(#[from] serde_json::Error),
	/// Valid JSON, but not an array.
	#[error("expected a JSON array")]
	NotArray,
}

/// Position of the `index`th (0-based) node of a query-supplied graph.
pub fn fan_position(index: usize) -> Position {
	let i = index as f64;
	Position::new(200.0 + 100.0 * i, 100.0 + 50.0 * i)
}

/// Percent-decode like `decodeURIComponent`, rejecting stray `%`.
fn decode_component(raw: &str) -> Result<String, LoadError> {
	let bytes = raw.as_bytes();
	for (i, _) in raw.match_indices('%') {
		let valid = bytes
			.get(i + 1..i + 3)
			.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
		if !valid {
			return Err(LoadError::Decode(i));
		}
	}
	Ok(percent_decode_str(raw).decode_utf8()?.into_owned())
}

/// Label text for one array element.
///
/// Strings are used as-is, numbers and nested values show their JSON text,
/// `null` and booleans render as an empty label.
fn element_label(item: Value) -> String {
	match item {
		Value::String(label) => label,
		Value::Null | Value::Bool(_) => String::new(),
		other => other.to_string(),
	}
}

/// Decode and parse the raw parameter into node labels.
pub fn parse_labels(raw: &str) -> Result<Vec<String>, LoadError> {
	let decoded = decode_component(raw)?;
	let Value::Array(items) = serde_json::from_str::<Value>(&decoded)? else {
		return Err(LoadError::NotArray);
	};
	Ok(items.into_iter().map(element_label).collect())
}

/// Build the starting graph. Absent or unusable input falls back to `defaults`.
pub fn load(raw: Option<&str>, defaults: &SeedGraph) -> GraphStore {
	let Some(raw) = raw else {
		info!("no nodes parameter, loading default graph");
		return defaults.to_store();
	};
	match parse_labels(raw) {
		Ok(labels) => {
			info!("loading {} nodes from query", labels.len());
			let nodes = labels.into_iter().zip(1..).map(|(label, id)| Node {
				id: NodeId(id),
				label,
				position: fan_position(id as usize - 1),
				color: NODE_COLOR.into(),
			});
			GraphStore::from_parts(nodes, std::iter::empty())
		}
		Err(err) => {
			warn!("error parsing nodes from query: {err}");
			defaults.to_store()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn labels(store: &GraphStore) -> Vec<&str> {
		store.nodes().iter().map(|n| n.label.as_str()).collect()
	}

	fn assert_default(store: &GraphStore) {
		assert_eq!(labels(store), ["Node 1", "Node 2", "Node 3"]);
		let pairs: Vec<_> = store
			.edges()
			.iter()
			.map(|e| (e.source.0, e.target.0, e.animated))
			.collect();
		assert_eq!(pairs, [(1, 2, true), (2, 3, true)]);
	}

	#[test]
	fn absent_param_gives_default_graph() {
		let store = load(None, &DEFAULT_GRAPH);
		assert_default(&store);
		assert_eq!(store.nodes()[0].position, Position::new(250.0, 0.0));
	}

	#[test]
	fn labels_fan_out_diagonally() {
		let store = load(Some(r#"["X","Y"]"#), &DEFAULT_GRAPH);
		assert_eq!(labels(&store), ["X", "Y"]);
		assert!(store.edges().is_empty());
		let ids: Vec<_> = store.nodes().iter().map(|n| n.id.0).collect();
		assert_eq!(ids, [1, 2]);
		assert_eq!(store.nodes()[0].position, Position::new(200.0, 100.0));
		assert_eq!(store.nodes()[1].position, Position::new(300.0, 150.0));
	}

	#[test]
	fn percent_encoded_param_is_decoded() {
		let store = load(Some("%5B%22A%22%2C%22B%22%2C%22C%22%5D"), &DEFAULT_GRAPH);
		assert_eq!(labels(&store), ["A", "B", "C"]);
		assert_eq!(store.next_label(), "Node 4");
	}

	#[test]
	fn invalid_json_falls_back() {
		assert_default(&load(Some("not-json"), &DEFAULT_GRAPH));
	}

	#[test]
	fn non_array_falls_back() {
		assert_default(&load(Some(r#"{"a":1}"#), &DEFAULT_GRAPH));
		assert!(matches!(parse_labels("\"a\""), Err(LoadError::NotArray)));
	}

	#[test]
	fn non_string_elements_become_labels() {
		let store = load(Some(r#"["a",2,1.5,null,true,[1]]"#), &DEFAULT_GRAPH);
		assert_eq!(labels(&store), ["a", "2", "1.5", "", "", "[1]"]);
		assert!(store.edges().is_empty());
		assert_eq!(store.nodes()[1].position, Position::new(300.0, 150.0));
	}

	#[test]
	fn stray_percent_is_a_decode_error() {
		assert!(matches!(parse_labels("%zz"), Err(LoadError::Decode(0))));
		assert!(matches!(parse_labels("[\"%E0%A4%A\"]"), Err(LoadError::Decode(_))));
		assert!(matches!(parse_labels("%FF"), Err(LoadError::Utf8(_))));
	}

	#[test]
	fn empty_array_gives_empty_graph() {
		let store = load(Some("[]"), &DEFAULT_GRAPH);
		assert!(store.is_empty());
		assert_eq!(store.next_label(), "Node 1");
	}

	#[test]
	fn custom_defaults_are_used() {
		let seed = SeedGraph {
			nodes: &[("only", Position::new(1.0, 2.0))],
			edges: &[(1, 5)],
		};
		let store = load(Some("nope"), &seed);
		assert_eq!(labels(&store), ["only"]);
		assert!(store.edges().is_empty());
	}
}
