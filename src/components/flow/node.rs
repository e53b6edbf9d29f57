use leptos::prelude::*;
use web_sys::{FocusEvent, KeyboardEvent, MouseEvent};

use super::commands::GraphCommands;
use super::editor::{EditOutcome, LabelEditor};
use super::state::{DragState, InteractionState, NODE_HEIGHT, NODE_WIDTH, Selection, source_handle};
use crate::graph::NodeId;

/// One node card: handles, remove button and the editable label.
#[component]
pub fn FlowNode(id: NodeId) -> impl IntoView {
	let commands = expect_context::<GraphCommands>();
	let ui = expect_context::<StoredValue<InteractionState>>();
	let selection = expect_context::<RwSignal<Option<Selection>>>();
	let node = Memo::new(move |_| commands.node(id));
	let editor = RwSignal::new(LabelEditor::default());
	let editing = Memo::new(move |_| editor.with(LabelEditor::is_editing));
	let input_ref = NodeRef::<leptos::html::Input>::new();

	Effect::new(move |_| {
		if !editing.get() {
			return;
		}
		if let Some(input) = input_ref.get() {
			let _ = input.focus();
			input.select();
		}
	});

	let finish = move |outcome: EditOutcome| {
		if let EditOutcome::Commit(label) = outcome {
			commands.rename_node(id, label);
		}
	};

	let on_mousedown = move |ev: MouseEvent| {
		ev.stop_propagation();
		if ev.button() != 0 || editing.get_untracked() {
			return;
		}
		let Some(position) = node.with_untracked(|n| n.as_ref().map(|n| n.position)) else {
			return;
		};
		selection.set(Some(Selection::Node(id)));
		ui.update_value(|s| {
			s.drag = DragState {
				node: Some(id),
				start_x: ev.client_x() as f64,
				start_y: ev.client_y() as f64,
				node_start: position,
			};
		});
	};

	let on_connect_start = move |ev: MouseEvent| {
		ev.stop_propagation();
		let Some(position) = node.with_untracked(|n| n.as_ref().map(|n| n.position)) else {
			return;
		};
		ui.update_value(|s| {
			s.connect.source = Some(id);
			s.connect.pointer = source_handle(position);
		});
	};

	let on_dblclick = move |_: MouseEvent| {
		let label = node.with_untracked(|n| n.as_ref().map(|n| n.label.clone()));
		if let Some(label) = label {
			editor.update(|e| e.begin(&label));
		}
	};

	let on_keydown = move |ev: KeyboardEvent| {
		ev.stop_propagation();
		if let Some(outcome) = editor.try_update(|e| e.key(&ev.key())) {
			finish(outcome);
		}
	};

	let on_blur = move |_: FocusEvent| {
		if let Some(outcome) = editor.try_update(LabelEditor::blur) {
			finish(outcome);
		}
	};

	let color = move || node.with(|n| n.as_ref().map(|n| n.color.clone()).unwrap_or_default());

	view! {
		<div
			class="flow-node"
			class:selected=move || selection.get() == Some(Selection::Node(id))
			style:left=move || {
				node.with(|n| n.as_ref().map(|n| n.position.x).unwrap_or_default()).to_string() + "px"
			}
			style:top=move || {
				node.with(|n| n.as_ref().map(|n| n.position.y).unwrap_or_default()).to_string() + "px"
			}
			style:width=format!("{NODE_WIDTH}px")
			style:height=format!("{NODE_HEIGHT}px")
			on:mousedown=on_mousedown
		>
			<div class="flow-handle flow-handle-target" />
			<div
				class="flow-node-remove"
				title="Remove node"
				on:mousedown=|ev: MouseEvent| ev.stop_propagation()
				on:click=move |_| commands.remove_node(id)
			>
				"×"
			</div>
			<Show
				when=move || editing.get()
				fallback=move || {
					view! {
						<div class="flow-node-label" style:color=color on:dblclick=on_dblclick>
							{move || node.with(|n| n.as_ref().map(|n| n.label.clone()).unwrap_or_default())}
						</div>
					}
				}
			>
				<input
					node_ref=input_ref
					class="flow-node-input"
					style:color=color
					value=editor.with_untracked(|e| e.draft().unwrap_or_default().to_owned())
					on:input=move |ev| editor.update(|e| e.input(event_target_value(&ev)))
					on:keydown=on_keydown
					on:blur=on_blur
				/>
			</Show>
			<div class="flow-handle flow-handle-source" on:mousedown=on_connect_start />
		</div>
	}
}
