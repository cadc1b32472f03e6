//! Graph model: nodes, links and the rules tying node size to text.

use serde::{Deserialize, Serialize};

/// Fill colours handed out to nodes by insertion index.
pub const PALETTE: &[&str] = &["#7c5cff", "#4ce0c4", "#ff9aa2", "#ffd97a", "#6be7ff"];

/// Smallest radius any node may have.
pub const MIN_RADIUS: f64 = 36.0;

/// Identifier reserved for the root of a generated map.
pub const ROOT_ID: &str = "n0";

/// Palette colour for the node at insertion index `i`.
pub fn palette_color(i: usize) -> String {
	PALETTE[i % PALETTE.len()].to_string()
}

/// Radius for a node showing `text`: `max(36, 10 + len * 6)`.
pub fn radius_for(text: &str) -> f64 {
	MIN_RADIUS.max(10.0 + text.chars().count() as f64 * 6.0)
}

/// A single bubble on the map.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Stable for the lifetime of the graph.
	pub id: String,
	text: String,
	/// Centre x, in CSS pixels.
	pub x: f64,
	/// Centre y, in CSS pixels.
	pub y: f64,
	radius: f64,
	color: String,
}

impl Node {
	/// New node whose radius follows from `text`.
	pub fn new(id: impl Into<String>, text: impl Into<String>, x: f64, y: f64, color: impl Into<String>) -> Self {
		let text = text.into();
		Self {
			id: id.into(),
			radius: radius_for(&text),
			text,
			x,
			y,
			color: color.into(),
		}
	}

	/// Display label.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Replaces the label and recomputes the radius from it.
	pub fn set_text(&mut self, text: impl Into<String>) {
		self.text = text.into();
		self.radius = radius_for(&self.text);
	}

	/// Current radius, always [`radius_for`] of the label.
	pub fn radius(&self) -> f64 {
		self.radius
	}

	/// Fill colour chosen at creation.
	pub fn color(&self) -> &str {
		&self.color
	}

	/// Circular hit test: squared distance from `(px, py)` is below `(radius + margin)²`.
	pub fn contains(&self, px: f64, py: f64, margin: f64) -> bool {
		let (dx, dy) = (px - self.x, py - self.y);
		let r = self.radius + margin;
		dx * dx + dy * dy < r * r
	}
}

/// Unordered pair of node ids. Either end may name a node that no longer exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link(
	/// One end.
	pub String,
	/// The other end.
	pub String,
);

impl Link {
	/// Link between two node ids.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self(source.into(), target.into())
	}

	/// Whether either end is `id`.
	pub fn touches(&self, id: &str) -> bool {
		self.0 == id || self.1 == id
	}
}

/// Nodes in insertion order plus the links between them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	/// Insertion order; only id generation cares about it.
	pub nodes: Vec<Node>,
	/// May reference ids missing from `nodes`.
	pub links: Vec<Link>,
}

impl Graph {
	/// Graph from parts, as given.
	pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
		Self { nodes, links }
	}

	/// No nodes at all.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Node count.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Position of the node with `id`.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|n| n.id == id)
	}

	/// Node with `id`, if present.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Mutable node with `id`, if present.
	pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	/// First node in iteration order whose circle (grown by `margin`) contains the point.
	pub fn node_at(&self, x: f64, y: f64, margin: f64) -> Option<&Node> {
		self.nodes.iter().find(|n| n.contains(x, y, margin))
	}

	/// Index pair for a link, or `None` when either endpoint is missing.
	pub fn resolve(&self, link: &Link) -> Option<(usize, usize)> {
		Some((self.index_of(&link.0)?, self.index_of(&link.1)?))
	}

	/// Links whose endpoints both exist, as node pairs.
	pub fn resolved_links(&self) -> impl Iterator<Item = (&Node, &Node)> {
		self.links.iter().filter_map(|link| {
			let (a, b) = self.resolve(link)?;
			Some((&self.nodes[a], &self.nodes[b]))
		})
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn radius_has_floor_and_grows_with_text() {
		assert_eq!(radius_for(""), 36.0);
		assert_eq!(radius_for("abcd"), 36.0);
		assert_eq!(radius_for("abcde"), 40.0);
		assert_eq!(radius_for("Ocean Lab"), 64.0);
	}

	#[test]
	fn set_text_recomputes_radius() {
		let mut node = Node::new("n1", "sea", 0.0, 0.0, palette_color(1));
		assert_eq!(node.radius(), 36.0);
		node.set_text("a much longer label");
		assert_eq!(node.radius(), 10.0 + 19.0 * 6.0);
		assert_eq!(node.color(), "#4ce0c4");
	}

	#[test]
	fn palette_wraps_by_index() {
		assert_eq!(palette_color(0), "#7c5cff");
		assert_eq!(palette_color(5), "#7c5cff");
		assert_eq!(palette_color(7), "#ff9aa2");
	}

	#[test]
	fn node_at_uses_first_match_and_margin() {
		let graph = Graph::new(
			vec![
				Node::new("a", "a", 100.0, 100.0, palette_color(0)),
				Node::new("b", "b", 110.0, 100.0, palette_color(1)),
			],
			vec![],
		);
		assert_eq!(graph.node_at(105.0, 100.0, 0.0).map(|n| n.id.as_str()), Some("a"));
		assert!(graph.node_at(100.0, 139.0, 0.0).is_none());
		assert_eq!(graph.node_at(100.0, 139.0, 6.0).map(|n| n.id.as_str()), Some("a"));
	}

	#[test]
	fn dangling_links_are_skipped() {
		let graph = Graph::new(
			vec![
				Node::new("a", "a", 0.0, 0.0, palette_color(0)),
				Node::new("b", "b", 10.0, 0.0, palette_color(1)),
			],
			vec![Link::new("a", "b"), Link::new("a", "ghost")],
		);
		assert_eq!(graph.resolved_links().count(), 1);
		assert!(graph.resolve(&graph.links[1]).is_none());
	}

	proptest! {
		#[test]
		fn radius_tracks_label_length(initial in ".{0,40}", edited in ".{0,40}") {
			let expected = |t: &str| 36f64.max(10.0 + 6.0 * t.chars().count() as f64);
			prop_assert_eq!(radius_for(&initial), expected(&initial));

			let mut node = Node::new("n1", initial.clone(), 0.0, 0.0, palette_color(1));
			prop_assert_eq!(node.radius(), expected(&initial));
			node.set_text(edited.clone());
			prop_assert_eq!(node.radius(), radius_for(node.text()));
			prop_assert_eq!(node.radius(), expected(&edited));
			prop_assert!(node.radius() >= MIN_RADIUS);
		}
	}
}
