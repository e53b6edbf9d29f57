use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use super::commands::GraphCommands;
use super::node::FlowNode;
use super::render;
use super::state::{
	InteractionState, Point, Selection, ViewTransform, edge_at, graph_bounds, node_at,
};
use crate::config::EditorConfig;
use crate::graph::Position;

fn local_point(ev: &MouseEvent, el: &Element) -> Point {
	let rect = el.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn parent_width(el: &Element) -> f64 {
	el.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(800.0)
}

/// Advance the animation clock and snapshot what one frame paints.
///
/// `None` once the component owning these handles has been disposed.
fn frame_inputs(
	transform: RwSignal<ViewTransform>,
	selection: RwSignal<Option<Selection>>,
	ui: StoredValue<InteractionState>,
) -> Option<(ViewTransform, Option<Selection>, InteractionState)> {
	let t = transform.try_get_untracked()?;
	let selected = selection.try_get_untracked()?;
	let state = ui.try_update_value(|s| {
		s.tick(0.016);
		s.clone()
	})?;
	Some((t, selected, state))
}

/// Interactive diagram: painted edges under a layer of DOM node cards.
#[component]
pub fn FlowCanvas(commands: GraphCommands) -> impl IntoView {
	let config = use_context::<EditorConfig>().unwrap_or_default();
	let (height, spawn_area) = (config.canvas_height, config.spawn_area);
	let (min_zoom, max_zoom, zoom_step, fit_padding) = (
		config.min_zoom,
		config.max_zoom,
		config.zoom_step,
		config.fit_padding,
	);

	let transform = RwSignal::new(ViewTransform::default());
	let ui = StoredValue::new(InteractionState::default());
	let selection = RwSignal::new(None::<Selection>);
	provide_context(commands);
	provide_context(ui);
	provide_context(selection);

	let surface_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let fit_view = move || {
		let (w, h) = ui.with_value(|s| (s.width, s.height));
		if let Some(bounds) = commands.with_untracked(graph_bounds) {
			transform.set(ViewTransform::fit(bounds, w, h, fit_padding, min_zoom, max_zoom));
		}
	};

	let zoom_by = move |factor: f64| {
		let (w, h) = ui.with_value(|s| (s.width, s.height));
		transform.update(|t| *t = t.zoom_at(w / 2.0, h / 2.0, factor, min_zoom, max_zoom));
	};

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window, canvas disabled");
			return;
		};

		let w = parent_width(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(height as u32);

		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>(),
			_ => {
				error!("2d context unavailable, canvas disabled");
				return;
			}
		};
		let Ok(ctx) = ctx else {
			error!("2d context has unexpected type");
			return;
		};
		ui.update_value(|s| s.resize(w, height));
		fit_view();

		let (canvas_resize, resize_self) = (canvas.clone(), resize_cb.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let nw = parent_width(&canvas_resize);
			if ui.try_update_value(|s| s.resize(nw, height)).is_none() {
				debug!("editor unmounted, removing resize listener");
				if let (Some(cb), Some(win)) = (resize_self.borrow().as_ref(), web_sys::window()) {
					let _ = win
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				return;
			}
			canvas_resize.set_width(nw as u32);
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let animate_inner = animate.clone();
		*animate.borrow_mut() = Some(Closure::new(move || {
			let Some((t, selected, s)) = frame_inputs(transform, selection, ui) else {
				debug!("editor unmounted, stopping repaint");
				return;
			};
			let painted =
				commands.try_with_untracked(|store| render::render(store, &t, &s, selected, &ctx));
			if painted.is_none() {
				return;
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let on_mousedown = move |ev: MouseEvent| {
		let Some(surface) = surface_ref.get() else {
			return;
		};
		let _ = surface.focus();
		let (x, y) = local_point(&ev, &surface);
		let t = transform.get_untracked();
		let hit = commands.with_untracked(|store| edge_at(store, &t, x, y));

		selection.set(hit.map(Selection::Edge));
		ui.update_value(|s| {
			if hit.is_none() {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = t.x;
				s.pan.transform_start_y = t.y;
			}
		});
	};

	let on_mousemove = move |ev: MouseEvent| {
		let Some(surface) = surface_ref.get() else {
			return;
		};
		let (x, y) = local_point(&ev, &surface);
		let t = transform.get_untracked();
		let s = ui.get_value();

		if let Some(id) = s.drag.node {
			let (dx, dy) = (
				(ev.client_x() as f64 - s.drag.start_x) / t.k,
				(ev.client_y() as f64 - s.drag.start_y) / t.k,
			);
			commands.move_node(
				id,
				Position::new(s.drag.node_start.x + dx, s.drag.node_start.y + dy),
			);
		} else if s.connect.source.is_some() {
			let pointer = t.screen_to_graph(x, y);
			ui.update_value(|s| s.connect.pointer = pointer);
		} else if s.pan.active {
			transform.set(ViewTransform {
				x: s.pan.transform_start_x + (x - s.pan.start_x),
				y: s.pan.transform_start_y + (y - s.pan.start_y),
				k: t.k,
			});
		}
	};

	let on_mouseup = move |ev: MouseEvent| {
		let source = ui.with_value(|s| s.connect.source);
		if let (Some(source), Some(surface)) = (source, surface_ref.get()) {
			let (x, y) = local_point(&ev, &surface);
			let (gx, gy) = transform.get_untracked().screen_to_graph(x, y);
			match commands.with_untracked(|store| node_at(store, gx, gy)) {
				Some(target) if target != source => {
					commands.connect(source, target);
				}
				_ => debug!("connection from {source} dropped on nothing"),
			}
		}
		ui.update_value(InteractionState::reset_gestures);
	};

	let on_mouseleave = move |_: MouseEvent| {
		ui.update_value(InteractionState::reset_gestures);
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(surface) = surface_ref.get() else {
			return;
		};
		let (x, y) = local_point(&ev, &surface);
		let factor = if ev.delta_y() > 0.0 { 1.0 / 1.1 } else { 1.1 };
		transform.update(|t| *t = t.zoom_at(x, y, factor, min_zoom, max_zoom));
	};

	let on_keydown = move |ev: KeyboardEvent| {
		if !matches!(ev.key().as_str(), "Delete" | "Backspace") {
			return;
		}
		if let Some(selected) = selection.get_untracked() {
			ev.prevent_default();
			commands.remove_selection(selected);
			selection.set(None);
		}
	};

	let add_node = move |_: MouseEvent| {
		let position = Position::new(
			js_sys::Math::random() * spawn_area.0,
			js_sys::Math::random() * spawn_area.1,
		);
		commands.add_numbered_node(position);
	};

	view! {
		<div class="flow-editor" style:height=format!("{height}px")>
			<div
				node_ref=surface_ref
				class="flow-surface"
				tabindex="0"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:keydown=on_keydown
			>
				<canvas node_ref=canvas_ref class="flow-canvas" />
				<div class="flow-nodes" style:transform=move || transform.get().css()>
					<For
						each=move || {
							commands.with(|s| s.nodes().iter().map(|n| n.id).collect::<Vec<_>>())
						}
						key=|id| *id
						children=move |id| view! { <FlowNode id=id /> }
					/>
				</div>
			</div>
			<button class="flow-add-node" on:click=add_node>
				"Add Node"
			</button>
			<div class="flow-controls">
				<button title="Zoom in" on:click=move |_| zoom_by(zoom_step)>
					"+"
				</button>
				<button title="Zoom out" on:click=move |_| zoom_by(1.0 / zoom_step)>
					"−"
				</button>
				<button title="Fit view" on:click=move |_| fit_view()>
					"⤢"
				</button>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn frame_inputs_end_with_owner() {
		let owner = Owner::new();
		let (transform, selection, ui) = owner.with(|| {
			(
				RwSignal::new(ViewTransform::default()),
				RwSignal::new(Some(Selection::Edge(crate::graph::EdgeId(1)))),
				StoredValue::new(InteractionState::default()),
			)
		});

		let (t, selected, state) = frame_inputs(transform, selection, ui).unwrap();
		assert_eq!(t, ViewTransform::default());
		assert_eq!(selected, Some(Selection::Edge(crate::graph::EdgeId(1))));
		assert!(state.flow_time > 0.0);

		drop(owner);
		assert!(frame_inputs(transform, selection, ui).is_none());
	}
}
