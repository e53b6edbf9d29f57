#![cfg(target_arch = "wasm32")]

use flow_editor::components::flow::GraphCommands;
use flow_editor::graph::{DEFAULT_GRAPH, NodeId, Position, loader};
use leptos::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn commands() -> (Owner, GraphCommands) {
	let owner = Owner::new();
	owner.set();
	(owner, GraphCommands::new(DEFAULT_GRAPH.to_store()))
}

#[wasm_bindgen_test]
fn remove_node_cascades() {
	let (_owner, commands) = commands();
	commands.remove_node(NodeId(2));
	commands.with_untracked(|s| {
		assert_eq!(s.nodes().len(), 2);
		assert!(s.edges().is_empty());
	});
}

#[wasm_bindgen_test]
fn numbered_nodes_continue_after_seed() {
	let (_owner, commands) = commands();
	let id = commands.add_numbered_node(Position::new(5.0, 5.0)).unwrap();
	assert_eq!(id, NodeId(4));
	assert_eq!(commands.node(id).unwrap().label, "Node 4");
}

#[wasm_bindgen_test]
fn connect_to_missing_node_is_rejected() {
	let (_owner, commands) = commands();
	assert_eq!(commands.connect(NodeId(1), NodeId(42)), None);
	assert!(commands.connect(NodeId(3), NodeId(1)).is_some());
	assert_eq!(commands.with_untracked(|s| s.edges().len()), 3);
}

#[wasm_bindgen_test]
fn decoding_matches_browser() {
	let raw = "%5B%22caf%C3%A9%22%2C%22a%20b%22%5D";
	let browser: String = js_sys::decode_uri_component(raw).unwrap().into();
	let labels = loader::parse_labels(raw).unwrap();
	assert_eq!(labels, ["café", "a b"]);
	assert_eq!(browser, r#"["café","a b"]"#);
}
