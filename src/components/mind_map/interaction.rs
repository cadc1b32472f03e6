//! Pointer handling: dragging, hover tracking and label edits.

use log::debug;

use super::error::MindMapError;
use super::types::Graph;

/// Extra reach of the hover hit test beyond the node radius.
pub const HOVER_MARGIN: f64 = 6.0;

/// A drag in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
	/// Node being held.
	pub node_id: String,
	/// Pointer minus node centre when the drag started.
	pub offset_x: f64,
	/// See `offset_x`.
	pub offset_y: f64,
	/// Position the node is held at until release.
	pub pin_x: f64,
	/// See `pin_x`.
	pub pin_y: f64,
}

/// Which node, if any, is being dragged or hovered.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	/// Active drag, set between pointer down and up.
	pub drag: Option<DragState>,
	/// Id of the node under the pointer.
	pub hover: Option<String>,
}

impl InteractionController {
	/// Idle controller.
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether a node is currently held.
	pub fn is_dragging(&self) -> bool {
		self.drag.is_some()
	}

	/// Starts a drag on the first node under the pointer. Returns whether one was hit.
	pub fn pointer_down(&mut self, graph: &Graph, x: f64, y: f64) -> bool {
		self.drag = graph.node_at(x, y, 0.0).map(|node| DragState {
			node_id: node.id.clone(),
			offset_x: x - node.x,
			offset_y: y - node.y,
			pin_x: node.x,
			pin_y: node.y,
		});
		self.drag.is_some()
	}

	/// Refreshes hover and moves the dragged node. Returns whether a node moved.
	pub fn pointer_move(&mut self, graph: &mut Graph, x: f64, y: f64) -> bool {
		self.hover = graph.node_at(x, y, HOVER_MARGIN).map(|n| n.id.clone());

		let Some(drag) = self.drag.as_mut() else {
			return false;
		};
		drag.pin_x = x - drag.offset_x;
		drag.pin_y = y - drag.offset_y;
		self.apply_pin(graph);
		true
	}

	/// Ends any drag, wherever the pointer is.
	pub fn pointer_up(&mut self) {
		self.drag = None;
	}

	/// Puts the dragged node back where the pointer holds it. Call after every layout step.
	pub fn apply_pin(&self, graph: &mut Graph) {
		let Some(drag) = &self.drag else {
			return;
		};
		if let Some(node) = graph.node_mut(&drag.node_id) {
			node.x = drag.pin_x;
			node.y = drag.pin_y;
		}
	}

	/// Node a double-click at `(x, y)` would edit.
	pub fn edit_target(&self, graph: &Graph, x: f64, y: f64) -> Option<String> {
		graph.node_at(x, y, 0.0).map(|n| n.id.clone())
	}

	/// Drops selections pointing at nodes that are gone, e.g. after the graph was replaced.
	pub fn reset(&mut self) {
		self.drag = None;
		self.hover = None;
	}
}

/// Replaces a node's label with the trimmed `text`. Blank text is rejected and
/// leaves the node unchanged.
pub fn edit_text(graph: &mut Graph, id: &str, text: &str) -> Result<(), MindMapError> {
	let text = text.trim();
	if text.is_empty() {
		debug!("rejected blank label for {id}");
		return Err(MindMapError::EmptyText);
	}
	let node = graph
		.node_mut(id)
		.ok_or_else(|| MindMapError::UnknownNode(id.to_string()))?;
	node.set_text(text);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mind_map::layout::{Bounds, LayoutParams, step};
	use crate::components::mind_map::types::{Link, Node, palette_color};

	fn graph() -> Graph {
		Graph::new(
			vec![
				Node::new("n0", "root", 300.0, 300.0, palette_color(0)),
				Node::new("n1", "leaf", 330.0, 300.0, palette_color(1)),
				Node::new("n2", "far", 600.0, 500.0, palette_color(2)),
			],
			vec![Link::new("n0", "n1"), Link::new("n0", "n2")],
		)
	}

	#[test]
	fn pointer_down_picks_first_overlapping_node() {
		let mut ctl = InteractionController::new();
		assert!(ctl.pointer_down(&graph(), 315.0, 300.0));
		let drag = ctl.drag.as_ref().unwrap();
		assert_eq!(drag.node_id, "n0");
		assert_eq!((drag.offset_x, drag.offset_y), (15.0, 0.0));
	}

	#[test]
	fn pointer_down_on_empty_space_selects_nothing() {
		let mut ctl = InteractionController::new();
		assert!(!ctl.pointer_down(&graph(), 10.0, 10.0));
		assert!(!ctl.is_dragging());
	}

	#[test]
	fn drag_sets_pointer_minus_offset_across_steps() {
		let mut g = graph();
		let mut ctl = InteractionController::new();
		let (bounds, params) = (Bounds::new(1000.0, 800.0), LayoutParams::default());

		ctl.pointer_down(&g, 610.0, 505.0);
		step(&mut g, &bounds, &params);
		ctl.apply_pin(&mut g);
		assert!(ctl.pointer_move(&mut g, 700.0, 400.0));
		for _ in 0..5 {
			step(&mut g, &bounds, &params);
			ctl.apply_pin(&mut g);
			let n2 = g.node("n2").unwrap();
			assert_eq!((n2.x, n2.y), (690.0, 395.0));
		}
	}

	#[test]
	fn pointer_up_always_releases() {
		let mut g = graph();
		let mut ctl = InteractionController::new();
		ctl.pointer_down(&g, 600.0, 500.0);
		ctl.pointer_up();
		assert!(!ctl.pointer_move(&mut g, 0.0, 0.0));
		assert_eq!(g.node("n2").unwrap().x, 600.0);
	}

	#[test]
	fn hover_uses_wider_ring() {
		let mut g = graph();
		let mut ctl = InteractionController::new();
		// 40 px below n2: outside radius 36, inside 36 + 6
		ctl.pointer_move(&mut g, 600.0, 540.0);
		assert_eq!(ctl.hover.as_deref(), Some("n2"));
		assert!(ctl.edit_target(&g, 600.0, 540.0).is_none());
		ctl.pointer_move(&mut g, 600.0, 560.0);
		assert!(ctl.hover.is_none());
	}

	#[test]
	fn edit_trims_and_resizes() {
		let mut g = graph();
		edit_text(&mut g, "n1", "  a longer label  ").unwrap();
		let n1 = g.node("n1").unwrap();
		assert_eq!(n1.text(), "a longer label");
		assert_eq!(n1.radius(), 10.0 + 14.0 * 6.0);
	}

	#[test]
	fn blank_edit_keeps_previous_text() {
		let mut g = graph();
		let err = edit_text(&mut g, "n1", "   ").unwrap_err();
		assert!(matches!(err, MindMapError::EmptyText));
		let n1 = g.node("n1").unwrap();
		assert_eq!((n1.text(), n1.radius()), ("leaf", 36.0));
	}

	#[test]
	fn edit_unknown_node_fails() {
		let mut g = graph();
		assert!(matches!(
			edit_text(&mut g, "n9", "hello"),
			Err(MindMapError::UnknownNode(_))
		));
	}
}
