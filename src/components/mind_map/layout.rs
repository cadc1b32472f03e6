//! Force-directed relaxation applied once per frame.
//!
//! A step runs four phases in order: pairwise repulsion, link springs, a weak
//! pull toward the middle of the bounds, then clamping every circle inside the
//! bounds. Gains are per call, so the apparent speed follows the frame rate.
//! Pinned nodes are not special here; the interaction layer overrides the
//! dragged node after each step.

use super::types::Graph;

/// Tuning constants for [`step`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
	/// Extra spacing beyond touching circles before repulsion stops.
	pub repulsion_gap: f64,
	/// Fraction of the overlap corrected per step.
	pub repulsion_gain: f64,
	/// Lower bound on link rest length.
	pub spring_length: f64,
	/// Spacing added to the two radii when that exceeds `spring_length`.
	pub spring_padding: f64,
	/// Fraction of the stretch corrected per step.
	pub spring_gain: f64,
	/// Fraction of the distance to the middle covered per step.
	pub centering_gain: f64,
	/// Gap kept between a circle and the bounds edge.
	pub boundary_margin: f64,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			repulsion_gap: 20.0,
			repulsion_gain: 0.02,
			spring_length: 120.0,
			spring_padding: 30.0,
			spring_gain: 0.002,
			centering_gain: 0.002,
			boundary_margin: 6.0,
		}
	}
}

/// Axis-aligned rectangle nodes are kept inside, origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
}

impl Bounds {
	/// Bounds of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Middle point.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

/// Unit vector from `(ax, ay)` to `(bx, by)` and the distance, floored at 1.
fn axis(ax: f64, ay: f64, bx: f64, by: f64) -> (f64, f64, f64) {
	let (dx, dy) = (bx - ax, by - ay);
	let dist = (dx * dx + dy * dy).max(1.0).sqrt();
	(dx / dist, dy / dist, dist)
}

/// Moves `a` and `b` apart by `amount` in total along `(ux, uy)` (negative pulls together).
fn separate(graph: &mut Graph, a: usize, b: usize, ux: f64, uy: f64, amount: f64) {
	let half = amount / 2.0;
	graph.nodes[a].x -= ux * half;
	graph.nodes[a].y -= uy * half;
	graph.nodes[b].x += ux * half;
	graph.nodes[b].y += uy * half;
}

/// Pushes apart every pair closer than the sum of their radii plus the gap.
pub fn apply_repulsion(graph: &mut Graph, params: &LayoutParams) {
	let n = graph.nodes.len();
	for i in 0..n {
		for j in (i + 1)..n {
			let (a, b) = (&graph.nodes[i], &graph.nodes[j]);
			let min_dist = a.radius() + b.radius() + params.repulsion_gap;
			let (ux, uy, dist) = axis(a.x, a.y, b.x, b.y);
			if dist < min_dist {
				separate(graph, i, j, ux, uy, (min_dist - dist) * params.repulsion_gain);
			}
		}
	}
}

/// Pulls linked nodes toward their rest length. Links to missing nodes are ignored.
pub fn apply_springs(graph: &mut Graph, params: &LayoutParams) {
	for k in 0..graph.links.len() {
		let Some((i, j)) = graph.resolve(&graph.links[k]) else {
			continue;
		};
		if i == j {
			continue;
		}
		let (a, b) = (&graph.nodes[i], &graph.nodes[j]);
		let target = params.spring_length.max(a.radius() + b.radius() + params.spring_padding);
		let (ux, uy, dist) = axis(a.x, a.y, b.x, b.y);
		separate(graph, i, j, ux, uy, (target - dist) * params.spring_gain);
	}
}

/// Drifts every node a small fraction of the way toward the middle of `bounds`.
pub fn apply_centering(graph: &mut Graph, bounds: &Bounds, params: &LayoutParams) {
	let (mx, my) = bounds.center();
	for node in &mut graph.nodes {
		node.x += (mx - node.x) * params.centering_gain;
		node.y += (my - node.y) * params.centering_gain;
	}
}

/// Keeps each circle plus margin inside `bounds`. A circle too large for the
/// bounds settles on the low edge.
pub fn apply_clamp(graph: &mut Graph, bounds: &Bounds, params: &LayoutParams) {
	for node in &mut graph.nodes {
		let inset = node.radius() + params.boundary_margin;
		node.x = inset.max((bounds.width - inset).min(node.x));
		node.y = inset.max((bounds.height - inset).min(node.y));
	}
}

/// One relaxation step over all nodes.
pub fn step<'a>(graph: &'a mut Graph, bounds: &Bounds, params: &LayoutParams) -> &'a mut Graph {
	apply_repulsion(graph, params);
	apply_springs(graph, params);
	apply_centering(graph, bounds, params);
	apply_clamp(graph, bounds, params);
	graph
}
