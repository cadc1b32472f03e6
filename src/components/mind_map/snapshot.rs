//! JSON forms of a graph: the durable snapshot, the export document, and the
//! tolerant reader used for both loading and importing.

use serde::{Deserialize, Serialize};

use super::error::MindMapError;
use super::types::{Graph, Link, Node, palette_color};

/// One node as written to JSON.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeRecord {
	/// Node id.
	pub id: String,
	/// Label.
	pub text: String,
	/// Centre x.
	pub x: f64,
	/// Centre y.
	pub y: f64,
	/// Fill colour.
	pub color: String,
}

impl From<&Node> for NodeRecord {
	fn from(node: &Node) -> Self {
		Self {
			id: node.id.clone(),
			text: node.text().to_string(),
			x: node.x,
			y: node.y,
			color: node.color().to_string(),
		}
	}
}

/// What the durable slot holds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
	/// Nodes in insertion order.
	pub nodes: Vec<NodeRecord>,
	/// Links as `[source, target]` pairs.
	pub links: Vec<Link>,
	/// Milliseconds since the Unix epoch.
	#[serde(rename = "savedAt")]
	pub saved_at: u64,
}

impl Snapshot {
	/// Copies the graph, stamped with `saved_at` (ms since the epoch).
	pub fn capture(graph: &Graph, saved_at: u64) -> Self {
		Self {
			nodes: graph.nodes.iter().map(NodeRecord::from).collect(),
			links: graph.links.clone(),
			saved_at,
		}
	}

	/// Pretty-printed JSON.
	pub fn to_json(&self) -> Result<String, MindMapError> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

/// Export file contents: the snapshot without its timestamp.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportDocument {
	/// Nodes in insertion order.
	pub nodes: Vec<NodeRecord>,
	/// Links as `[source, target]` pairs.
	pub links: Vec<Link>,
}

impl ExportDocument {
	/// Copies the graph.
	pub fn capture(graph: &Graph) -> Self {
		Self {
			nodes: graph.nodes.iter().map(NodeRecord::from).collect(),
			links: graph.links.clone(),
		}
	}

	/// Pretty-printed JSON.
	pub fn to_json(&self) -> Result<String, MindMapError> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

#[derive(Deserialize)]
struct IncomingNode {
	id: String,
	text: String,
	x: f64,
	y: f64,
	#[serde(default)]
	color: Option<String>,
}

#[derive(Deserialize)]
struct IncomingGraph {
	nodes: Option<Vec<IncomingNode>>,
	links: Option<Vec<Link>>,
	#[serde(rename = "savedAt")]
	saved_at: Option<u64>,
}

/// A decoded payload, ready to replace the live graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded {
	/// Graph to install.
	pub graph: Graph,
	/// Timestamp, present only for durable snapshots.
	pub saved_at: Option<u64>,
}

/// Reads a snapshot or export document.
///
/// Both `nodes` and `links` must be present. Nodes without a colour (or with
/// an empty one) get the palette colour for their position.
pub fn decode(json: &str) -> Result<Decoded, MindMapError> {
	let incoming: IncomingGraph = serde_json::from_str(json)?;
	let nodes = incoming.nodes.ok_or(MindMapError::MissingField("nodes"))?;
	let links = incoming.links.ok_or(MindMapError::MissingField("links"))?;

	let nodes = nodes
		.into_iter()
		.enumerate()
		.map(|(i, n)| {
			let color = n.color.filter(|c| !c.trim().is_empty()).unwrap_or_else(|| palette_color(i));
			Node::new(n.id, n.text, n.x, n.y, color)
		})
		.collect();

	Ok(Decoded {
		graph: Graph::new(nodes, links),
		saved_at: incoming.saved_at,
	})
}
