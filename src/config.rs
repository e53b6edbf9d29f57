//! Editor settings.

use log::Level;

/// Editor settings, provided to the view through context.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
	/// Query parameter holding the initial node labels.
	pub query_param: &'static str,
	/// Height of the editor area in CSS pixels. Width follows the parent.
	pub canvas_height: f64,
	/// New nodes land at a random point inside `[0, w) x [0, h)`.
	pub spawn_area: (f64, f64),
	/// Smallest zoom factor reachable by wheel, buttons or fitting.
	pub min_zoom: f64,
	/// Largest zoom factor.
	pub max_zoom: f64,
	/// Factor applied by the zoom buttons.
	pub zoom_step: f64,
	/// Fraction of the canvas left free around the graph when fitting.
	pub fit_padding: f64,
	/// Console log verbosity.
	pub log_level: Level,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			query_param: "nodes",
			canvas_height: 500.0,
			spawn_area: (500.0, 300.0),
			min_zoom: 0.5,
			max_zoom: 2.0,
			zoom_step: 1.2,
			fit_padding: 0.1,
			log_level: Level::Debug,
		}
	}
}
