//! The command surface of the app: one [`Session`] owns the live map and talks
//! to the host only through the small collaborator traits below.

use std::time::Duration;

use log::{debug, error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::error::MindMapError;
use super::interaction;
use super::seed;
use super::snapshot::{self, ExportDocument, Snapshot};
use super::state::MindMapState;

/// Durable key-value slot.
pub trait Storage {
	/// Value under `key`, `None` if the slot is empty.
	fn get(&self, key: &str) -> Result<Option<String>, MindMapError>;
	/// Overwrites the slot.
	fn set(&self, key: &str, value: &str) -> Result<(), MindMapError>;
	/// Empties the slot.
	fn remove(&self, key: &str) -> Result<(), MindMapError>;
}

/// Destination for exported files.
pub trait FileSink {
	/// Hands `contents` to the user as `file_name`.
	fn export(&self, file_name: &str, contents: &str) -> Result<(), MindMapError>;
}

/// Blocking questions to the user.
pub trait UserPrompt {
	/// Yes/no question; `true` means go ahead.
	fn confirm(&self, message: &str) -> bool;
	/// New label for a node, or `None` if the user backed out.
	fn edit_text(&self, current: &str) -> Option<String>;
	/// Shows a message and waits for acknowledgement.
	fn alert(&self, message: &str);
}

/// Wall-clock time source.
pub trait Clock {
	/// Milliseconds since the Unix epoch.
	fn now_millis(&self) -> u64;
}

/// Host services a [`Session`] needs.
pub struct Collaborators {
	/// Snapshot slot.
	pub storage: Box<dyn Storage>,
	/// Export destination.
	pub files: Box<dyn FileSink>,
	/// Confirmations, label edits and alerts.
	pub prompt: Box<dyn UserPrompt>,
	/// Timestamps for snapshots and export names.
	pub clock: Box<dyn Clock>,
}

/// Names and delays used by a [`Session`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
	/// Storage slot holding the saved map.
	pub storage_key: String,
	/// Export files are named `<prefix><millis>.json`.
	pub export_prefix: String,
	/// Autosave delay after a drag or label edit.
	pub edit_delay: Duration,
	/// Autosave delay after generating a map.
	pub generate_delay: Duration,
	/// Autosave delay after importing a file.
	pub import_delay: Duration,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			storage_key: "muse-map".into(),
			export_prefix: "muse-map-".into(),
			edit_delay: Duration::from_millis(1200),
			generate_delay: Duration::from_millis(700),
			import_delay: Duration::from_millis(400),
		}
	}
}

/// Owns the live map and runs every user command against it.
pub struct Session {
	/// Graph, pointer state and layout settings.
	pub state: MindMapState,
	config: SessionConfig,
	host: Collaborators,
	rng: StdRng,
	last_saved: Option<u64>,
	autosave: Option<Duration>,
}

impl Session {
	/// Session over `state`; `rng_seed` drives map generation.
	pub fn new(state: MindMapState, config: SessionConfig, host: Collaborators, rng_seed: u64) -> Self {
		Self {
			state,
			config,
			host,
			rng: StdRng::seed_from_u64(rng_seed),
			last_saved: None,
			autosave: None,
		}
	}

	/// Nodes on the live map.
	pub fn node_count(&self) -> usize {
		self.state.graph.len()
	}

	/// When the map was last written to storage, if this session knows.
	pub fn last_saved(&self) -> Option<u64> {
		self.last_saved
	}

	/// Delay of the most recent autosave request since the last call, if any.
	pub fn take_autosave_request(&mut self) -> Option<Duration> {
		self.autosave.take()
	}

	fn request_autosave(&mut self, delay: Duration) {
		self.autosave = Some(delay);
	}

	/// Startup restore. Failures are logged and leave the map empty.
	pub fn restore(&mut self) -> bool {
		match self.load() {
			Ok(()) => true,
			Err(MindMapError::NotFound) => false,
			Err(e) => {
				warn!("could not restore saved map: {e}");
				false
			}
		}
	}

	/// Replaces the map with one grown from `seed_text`. Returns the node count.
	pub fn generate(&mut self, seed_text: &str) -> Result<usize, MindMapError> {
		let seed_text = seed_text.trim();
		if seed_text.is_empty() {
			return Err(MindMapError::EmptySeed);
		}
		let graph = seed::generate(seed_text, self.state.bounds.center(), &mut self.rng);
		info!("generated {} nodes from {seed_text:?}", graph.len());
		self.state.replace_graph(graph);
		self.request_autosave(self.config.generate_delay);
		Ok(self.node_count())
	}

	/// Writes the current map to storage. Returns `false` if the user declined.
	pub fn save(&mut self, with_confirmation: bool) -> Result<bool, MindMapError> {
		if with_confirmation && !self.host.prompt.confirm("Save the current map to local storage?") {
			return Ok(false);
		}
		self.write()?;
		info!("saved {} nodes", self.node_count());
		Ok(true)
	}

	fn write(&mut self) -> Result<(), MindMapError> {
		let now = self.host.clock.now_millis();
		let json = Snapshot::capture(&self.state.graph, now).to_json()?;
		self.host.storage.set(&self.config.storage_key, &json)?;
		self.last_saved = Some(now);
		Ok(())
	}

	/// Debounced background save. Errors never reach the user.
	pub fn autosave(&mut self) {
		match self.write() {
			Ok(()) => debug!("autosaved {} nodes", self.node_count()),
			Err(e) => warn!("autosave failed: {e}"),
		}
	}

	/// Replaces the map with the stored one. The live map is untouched on error.
	pub fn load(&mut self) -> Result<(), MindMapError> {
		let json = self
			.host
			.storage
			.get(&self.config.storage_key)?
			.ok_or(MindMapError::NotFound)?;
		let decoded = snapshot::decode(&json)?;
		info!("loaded {} nodes", decoded.graph.len());
		self.state.replace_graph(decoded.graph);
		self.last_saved = decoded.saved_at;
		Ok(())
	}

	/// Hands the map to the file sink. Returns the file name used.
	pub fn export(&self) -> Result<String, MindMapError> {
		let file_name = format!("{}{}.json", self.config.export_prefix, self.host.clock.now_millis());
		let json = ExportDocument::capture(&self.state.graph).to_json()?;
		self.host.files.export(&file_name, &json)?;
		info!("exported {} nodes to {file_name}", self.node_count());
		Ok(file_name)
	}

	/// Replaces the map with the contents of an exported file.
	pub fn import(&mut self, contents: &str) -> Result<usize, MindMapError> {
		let decoded = snapshot::decode(contents)?;
		info!("imported {} nodes", decoded.graph.len());
		self.state.replace_graph(decoded.graph);
		self.request_autosave(self.config.import_delay);
		Ok(self.node_count())
	}

	/// Empties the storage slot. Returns `false` if the user declined.
	pub fn clear_saved(&mut self, with_confirmation: bool) -> Result<bool, MindMapError> {
		if with_confirmation && !self.host.prompt.confirm("Clear the saved map from local storage?") {
			return Ok(false);
		}
		self.host.storage.remove(&self.config.storage_key)?;
		self.last_saved = None;
		info!("cleared saved map");
		Ok(true)
	}

	/// Relabels node `id`. Blank text is rejected.
	pub fn edit_node_text(&mut self, id: &str, text: &str) -> Result<(), MindMapError> {
		interaction::edit_text(&mut self.state.graph, id, text)?;
		self.request_autosave(self.config.edit_delay);
		Ok(())
	}

	/// Double-click: ask for a new label for the node under the pointer.
	pub fn edit_at(&mut self, x: f64, y: f64) -> bool {
		let Some(id) = self.state.interaction.edit_target(&self.state.graph, x, y) else {
			return false;
		};
		let Some(current) = self.state.graph.node(&id).map(|n| n.text().to_string()) else {
			return false;
		};
		let Some(reply) = self.host.prompt.edit_text(&current) else {
			return false;
		};
		match self.edit_node_text(&id, &reply) {
			Ok(()) => true,
			Err(e) => {
				debug!("edit of {id} ignored: {e}");
				false
			}
		}
	}

	/// Starts dragging the node under the pointer, if any.
	pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
		self.state.interaction.pointer_down(&self.state.graph, x, y)
	}

	/// Updates hover and the dragged node, asking for an autosave when it moved.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if self.state.interaction.pointer_move(&mut self.state.graph, x, y) {
			self.request_autosave(self.config.edit_delay);
		}
	}

	/// Releases the dragged node.
	pub fn pointer_up(&mut self) {
		self.state.interaction.pointer_up();
	}

	/// Logs a failed user command and tells the user about it.
	pub fn report(&self, err: &MindMapError) {
		error!("{err} ({:?})", err.kind());
		self.host.prompt.alert(&err.to_string());
	}
}
