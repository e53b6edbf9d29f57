use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::flow::{FlowCanvas, GraphCommands};
use crate::config::EditorConfig;
use crate::graph::{DEFAULT_GRAPH, loader};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<EditorConfig>().unwrap_or_default();
	let query = use_query_map();

	// Seeded once; later query changes don't replace the user's edits
	let raw = query.with_untracked(|q| q.get(config.query_param));
	let commands = GraphCommands::new(loader::load(raw.as_deref(), &DEFAULT_GRAPH));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="page">
				<FlowCanvas commands=commands />
				<p class="subtitle">
					"Drag nodes to move them. Drag from a node's bottom handle onto another node to connect. Double-click a label to rename it."
				</p>
			</div>
		</ErrorBoundary>
	}
}
