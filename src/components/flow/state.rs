//! View transform, gesture state and hit testing for the diagram.

use crate::graph::{EdgeId, GraphStore, NodeId, Position};

/// Node card width in graph units.
pub const NODE_WIDTH: f64 = 150.0;
/// Node card height in graph units.
pub const NODE_HEIGHT: f64 = 44.0;
/// Screen-space distance within which a click selects an edge.
pub const EDGE_HIT_PX: f64 = 6.0;
const CURVE_SAMPLES: usize = 24;

/// `(x, y)` pair.
pub type Point = (f64, f64);

/// Graph-to-screen mapping: `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Map a canvas-relative point into graph coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Map a graph point onto the canvas.
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> Point {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Scale by `factor` keeping the graph point under `(sx, sy)` fixed.
	pub fn zoom_at(&self, sx: f64, sy: f64, factor: f64, min: f64, max: f64) -> Self {
		let k = (self.k * factor).clamp(min, max);
		let ratio = k / self.k;
		Self {
			x: sx - (sx - self.x) * ratio,
			y: sy - (sy - self.y) * ratio,
			k,
		}
	}

	/// Center `bounds` in a `width` x `height` viewport, leaving `padding` of it free.
	pub fn fit(bounds: Rect, width: f64, height: f64, padding: f64, min: f64, max: f64) -> Self {
		let usable = 1.0 - 2.0 * padding;
		let k = (width * usable / bounds.width)
			.min(height * usable / bounds.height)
			.clamp(min, max);
		let (cx, cy) = bounds.center();
		Self {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		}
	}

	/// CSS `transform` value for the node layer.
	pub fn css(&self) -> String {
		format!("translate({}px, {}px) scale({})", self.x, self.y, self.k)
	}
}

/// Axis-aligned rectangle in graph coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Extent to the right.
	pub width: f64,
	/// Extent downwards.
	pub height: f64,
}

impl Rect {
	/// Card area of a node at `position`.
	pub fn node(position: Position) -> Self {
		Self {
			x: position.x,
			y: position.y,
			width: NODE_WIDTH,
			height: NODE_HEIGHT,
		}
	}

	/// Inclusive point test.
	pub fn contains(&self, px: f64, py: f64) -> bool {
		px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
	}

	/// Midpoint.
	pub fn center(&self) -> Point {
		(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	fn union(self, other: Self) -> Self {
		let (x, y) = (self.x.min(other.x), self.y.min(other.y));
		Self {
			x,
			y,
			width: (self.x + self.width).max(other.x + other.width) - x,
			height: (self.y + self.height).max(other.y + other.height) - y,
		}
	}
}

/// A node card following the pointer.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Node being dragged.
	pub node: Option<NodeId>,
	/// Pointer client x at mousedown.
	pub start_x: f64,
	/// Pointer client y at mousedown.
	pub start_y: f64,
	/// Node position at mousedown.
	pub node_start: Position,
}

/// Background drag moving the view.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// A pan is in progress.
	pub active: bool,
	/// Pointer x at mousedown, canvas-relative.
	pub start_x: f64,
	/// Pointer y at mousedown, canvas-relative.
	pub start_y: f64,
	/// Transform x at mousedown.
	pub transform_start_x: f64,
	/// Transform y at mousedown.
	pub transform_start_y: f64,
}

/// A connection being dragged out of a source handle.
#[derive(Clone, Debug, Default)]
pub struct ConnectState {
	/// Node the connection starts from.
	pub source: Option<NodeId>,
	/// Pointer in graph coordinates.
	pub pointer: Point,
}

/// The element Delete/Backspace removes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
	/// A node card; removing it cascades to its edges.
	Node(NodeId),
	/// A single edge.
	Edge(EdgeId),
}

/// Pointer gesture state shared by the canvas and the node cards.
#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	/// Node card being dragged.
	pub drag: DragState,
	/// Background pan in progress.
	pub pan: PanState,
	/// Connection being dragged out of a handle.
	pub connect: ConnectState,
	/// Canvas size in CSS pixels.
	pub width: f64,
	/// Canvas height in CSS pixels.
	pub height: f64,
	/// Seconds of animation, drives the dash flow.
	pub flow_time: f64,
}

impl InteractionState {
	/// End any drag, pan or connection.
	pub fn reset_gestures(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.connect.source = None;
	}

	/// Advance the animation clock.
	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	/// Record a new canvas size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// Bottom-center connection point of a card.
pub fn source_handle(position: Position) -> Point {
	(position.x + NODE_WIDTH / 2.0, position.y + NODE_HEIGHT)
}

/// Top-center connection point of a card.
pub fn target_handle(position: Position) -> Point {
	(position.x + NODE_WIDTH / 2.0, position.y)
}

/// Control points of the curve from a bottom handle down to a top handle.
pub fn edge_curve(from: Point, to: Point) -> [Point; 4] {
	let offset = ((to.1 - from.1).abs() * 0.5).max(25.0);
	[from, (from.0, from.1 + offset), (to.0, to.1 - offset), to]
}

/// Point at `t` in `[0, 1]` along a cubic curve.
pub fn bezier_point([p0, p1, p2, p3]: [Point; 4], t: f64) -> Point {
	let u = 1.0 - t;
	let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
	(
		a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
		a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
	)
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len2 = dx * dx + dy * dy;
	let t = if len2 < 1e-12 {
		0.0
	} else {
		(((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

/// Approximate distance from `p` to a cubic curve.
pub fn curve_distance(curve: [Point; 4], p: Point) -> f64 {
	let mut prev = curve[0];
	let mut best = f64::INFINITY;
	for i in 1..=CURVE_SAMPLES {
		let next = bezier_point(curve, i as f64 / CURVE_SAMPLES as f64);
		best = best.min(segment_distance(p, prev, next));
		prev = next;
	}
	best
}

/// Curve of every edge whose endpoints both resolve.
pub fn edge_curves(store: &GraphStore) -> impl Iterator<Item = (EdgeId, bool, [Point; 4])> + '_ {
	store.edges().iter().filter_map(|edge| {
		let source = store.node(edge.source)?;
		let target = store.node(edge.target)?;
		Some((
			edge.id,
			edge.animated,
			edge_curve(source_handle(source.position), target_handle(target.position)),
		))
	})
}

/// Topmost node whose card contains the graph point.
pub fn node_at(store: &GraphStore, gx: f64, gy: f64) -> Option<NodeId> {
	store
		.nodes()
		.iter()
		.rev()
		.find(|n| Rect::node(n.position).contains(gx, gy))
		.map(|n| n.id)
}

/// Closest edge within click tolerance of a canvas-relative point.
pub fn edge_at(store: &GraphStore, transform: &ViewTransform, sx: f64, sy: f64) -> Option<EdgeId> {
	let p = transform.screen_to_graph(sx, sy);
	let tolerance = EDGE_HIT_PX / transform.k;
	edge_curves(store)
		.map(|(id, _, curve)| (id, curve_distance(curve, p)))
		.filter(|&(_, d)| d <= tolerance)
		.min_by(|a, b| a.1.total_cmp(&b.1))
		.map(|(id, _)| id)
}

/// Smallest rectangle holding every node card.
pub fn graph_bounds(store: &GraphStore) -> Option<Rect> {
	store
		.nodes()
		.iter()
		.map(|n| Rect::node(n.position))
		.reduce(Rect::union)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zoom_keeps_pointer_fixed() {
		let t = ViewTransform {
			x: 30.0,
			y: -10.0,
			k: 1.0,
		};
		let before = t.screen_to_graph(200.0, 120.0);
		let zoomed = t.zoom_at(200.0, 120.0, 1.2, 0.5, 2.0);
		let after = zoomed.screen_to_graph(200.0, 120.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		assert_eq!(t.zoom_at(0.0, 0.0, 100.0, 0.5, 2.0).k, 2.0);
	}

	#[test]
	fn fit_places_every_node_inside_viewport() {
		let store = crate::graph::DEFAULT_GRAPH.to_store();
		let bounds = graph_bounds(&store).unwrap();
		let t = ViewTransform::fit(bounds, 800.0, 500.0, 0.1, 0.5, 2.0);
		for node in store.nodes() {
			let r = Rect::node(node.position);
			let (x0, y0) = t.graph_to_screen(r.x, r.y);
			let (x1, y1) = t.graph_to_screen(r.x + r.width, r.y + r.height);
			assert!(x0 >= 0.0 && y0 >= 0.0 && x1 <= 800.0 && y1 <= 500.0);
		}
	}

	#[test]
	fn node_hit_prefers_topmost() {
		let mut store = GraphStore::new();
		let _below = store.add_node("below", Position::new(0.0, 0.0));
		let above = store.add_node("above", Position::new(10.0, 10.0));
		assert_eq!(node_at(&store, 20.0, 20.0), Some(above));
		assert_eq!(node_at(&store, 500.0, 500.0), None);
	}

	#[test]
	fn edge_hit_within_tolerance() {
		let mut store = GraphStore::new();
		let a = store.add_node("a", Position::new(0.0, 0.0));
		let b = store.add_node("b", Position::new(0.0, 200.0));
		let id = store.connect(a, b).unwrap();
		let t = ViewTransform::default();
		// straight vertical curve at x = 75
		assert_eq!(edge_at(&store, &t, 78.0, 120.0), Some(id));
		assert_eq!(edge_at(&store, &t, 100.0, 120.0), None);
	}

	#[test]
	fn curve_endpoints_are_handles() {
		let curve = edge_curve((0.0, 0.0), (100.0, 100.0));
		assert_eq!(bezier_point(curve, 0.0), (0.0, 0.0));
		assert_eq!(bezier_point(curve, 1.0), (100.0, 100.0));
	}
}
