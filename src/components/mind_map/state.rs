//! Per-frame state owned by a running map.

use super::interaction::InteractionController;
use super::layout::{self, Bounds, LayoutParams};
use super::types::{Graph, Node};

/// Live map plus everything a frame needs: layout settings, bounds and pointer state.
pub struct MindMapState {
	/// Nodes and links on screen.
	pub graph: Graph,
	/// Drag and hover tracking.
	pub interaction: InteractionController,
	/// Force constants for every step.
	pub params: LayoutParams,
	/// Canvas size in CSS pixels.
	pub bounds: Bounds,
	/// When false, `tick` leaves the graph untouched.
	pub animation_running: bool,
}

impl MindMapState {
	/// Empty map filling a `width` by `height` canvas.
	pub fn new(width: f64, height: f64, params: LayoutParams) -> Self {
		Self {
			graph: Graph::default(),
			interaction: InteractionController::new(),
			params,
			bounds: Bounds::new(width, height),
			animation_running: true,
		}
	}

	/// Swaps in a whole new graph, dropping drag and hover on the old one.
	pub fn replace_graph(&mut self, graph: Graph) {
		self.graph = graph;
		self.interaction.reset();
	}

	/// One frame: relax the layout, then hold the dragged node under the pointer.
	pub fn tick(&mut self) {
		if !self.animation_running {
			return;
		}
		layout::step(&mut self.graph, &self.bounds, &self.params);
		self.interaction.apply_pin(&mut self.graph);
	}

	/// Tracks a new canvas size; nodes are pulled inside on the next tick.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.bounds = Bounds::new(width, height);
	}

	/// Pauses or resumes the simulation, returning whether it now runs.
	pub fn toggle_animation(&mut self) -> bool {
		self.animation_running = !self.animation_running;
		self.animation_running
	}

	/// Node under the pointer, if it is still on the map.
	pub fn hovered_node(&self) -> Option<&Node> {
		self.interaction.hover.as_deref().and_then(|id| self.graph.node(id))
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::mind_map::seed;

	#[test]
	fn tick_keeps_dragged_node_pinned() {
		let mut state = MindMapState::new(900.0, 700.0, LayoutParams::default());
		let mut rng = StdRng::seed_from_u64(1);
		state.replace_graph(seed::generate("ocean", state.bounds.center(), &mut rng));

		let root = state.graph.nodes[0].clone();
		assert!(state.interaction.pointer_down(&state.graph, root.x + 5.0, root.y + 5.0));
		state.interaction.pointer_move(&mut state.graph, 200.0, 150.0);
		for _ in 0..30 {
			state.tick();
			let n0 = &state.graph.nodes[0];
			assert_eq!((n0.x, n0.y), (195.0, 145.0));
		}

		state.interaction.pointer_up();
		state.tick();
		assert_ne!((state.graph.nodes[0].x, state.graph.nodes[0].y), (195.0, 145.0));
	}

	#[test]
	fn paused_state_does_not_move() {
		let mut state = MindMapState::new(900.0, 700.0, LayoutParams::default());
		let mut rng = StdRng::seed_from_u64(2);
		state.replace_graph(seed::generate("forest", state.bounds.center(), &mut rng));
		state.animation_running = false;
		let before = state.graph.clone();
		state.tick();
		assert_eq!(state.graph, before);
	}

	#[test]
	fn toggle_pauses_and_resumes_layout() {
		let mut state = MindMapState::new(900.0, 700.0, LayoutParams::default());
		let mut rng = StdRng::seed_from_u64(3);
		state.replace_graph(seed::generate("river", state.bounds.center(), &mut rng));

		assert!(!state.toggle_animation());
		let before = state.graph.clone();
		state.tick();
		assert_eq!(state.graph, before);

		assert!(state.toggle_animation());
		state.tick();
		assert_ne!(state.graph, before);
	}

	#[test]
	fn replacing_graph_clears_stale_hover() {
		let mut state = MindMapState::new(900.0, 700.0, LayoutParams::default());
		state.interaction.hover = Some("n3".into());
		state.replace_graph(Graph::default());
		assert!(state.hovered_node().is_none());
		assert!(state.interaction.hover.is_none());
	}
}
