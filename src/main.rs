use flow_editor::config::EditorConfig;
use flow_editor::{App, init_logging};
use leptos::prelude::*;

fn main() {
	init_logging(EditorConfig::default().log_level);

	mount_to_body(|| {
		view! { <App /> }
	})
}
