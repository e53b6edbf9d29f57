use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{
	InteractionState, Point, Selection, ViewTransform, bezier_point, edge_curves, source_handle,
};
use crate::graph::GraphStore;

const GRID_GAP: f64 = 12.0;
const CROSS_ARM: f64 = 3.0;
const ARROW_SIZE: f64 = 8.0;
const DASH: f64 = 5.0;

pub fn render(
	store: &GraphStore,
	transform: &ViewTransform,
	ui: &InteractionState,
	selection: Option<Selection>,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, ui.width, ui.height);
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);
	draw_background(transform, ui, ctx);
	draw_edges(store, ui, selection, ctx);
	draw_pending_connection(store, ui, ctx);
	ctx.restore();
}

fn draw_background(transform: &ViewTransform, ui: &InteractionState, ctx: &CanvasRenderingContext2d) {
	let (gx0, gy0) = transform.screen_to_graph(0.0, 0.0);
	let (gx1, gy1) = transform.screen_to_graph(ui.width, ui.height);
	let (x0, y0) = (
		(gx0 / GRID_GAP).floor() * GRID_GAP,
		(gy0 / GRID_GAP).floor() * GRID_GAP,
	);

	ctx.set_stroke_style_str("#d0d0d6");
	ctx.set_line_width(1.0 / transform.k);
	ctx.begin_path();
	let mut x = x0;
	while x <= gx1 {
		let mut y = y0;
		while y <= gy1 {
			ctx.move_to(x - CROSS_ARM, y);
			ctx.line_to(x + CROSS_ARM, y);
			ctx.move_to(x, y - CROSS_ARM);
			ctx.line_to(x, y + CROSS_ARM);
			y += GRID_GAP;
		}
		x += GRID_GAP;
	}
	ctx.stroke();
}

fn draw_edges(
	store: &GraphStore,
	ui: &InteractionState,
	selection: Option<Selection>,
	ctx: &CanvasRenderingContext2d,
) {
	let dash_offset = -(ui.flow_time * 30.0) % (2.0 * DASH);

	for (id, animated, curve) in edge_curves(store) {
		let selected = selection == Some(Selection::Edge(id));
		let color = if selected { "#555555" } else { "#b1b1b7" };

		ctx.set_stroke_style_str(color);
		ctx.set_line_width(if selected { 2.0 } else { 1.0 });
		if animated {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(DASH),
				&JsValue::from_f64(DASH),
			));
			ctx.set_line_dash_offset(dash_offset);
		}

		let [p0, p1, p2, p3] = curve;
		ctx.begin_path();
		ctx.move_to(p0.0, p0.1);
		ctx.bezier_curve_to(p1.0, p1.1, p2.0, p2.1, p3.0, p3.1);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		// the head points along the curve's final tangent
		draw_arrow(ctx, bezier_point(curve, 0.95), p3, color);
	}
}

fn draw_arrow(ctx: &CanvasRenderingContext2d, from: Point, tip: Point, color: &str) {
	let (dx, dy) = (tip.0 - from.0, tip.1 - from.1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let (back_x, back_y) = (tip.0 - ux * ARROW_SIZE, tip.1 - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(tip.0, tip.1);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_pending_connection(store: &GraphStore, ui: &InteractionState, ctx: &CanvasRenderingContext2d) {
	let Some(source) = ui.connect.source.and_then(|id| store.node(id)) else {
		return;
	};
	let (x, y) = source_handle(source.position);
	ctx.set_stroke_style_str("#1a192b");
	ctx.set_line_width(1.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(DASH),
		&JsValue::from_f64(DASH),
	));
	ctx.begin_path();
	ctx.move_to(x, y);
	ctx.line_to(ui.connect.pointer.0, ui.connect.pointer.1);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}
