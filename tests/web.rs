#![cfg(target_arch = "wasm32")]

use muse_map::components::mind_map::layout::LayoutParams;
use muse_map::components::mind_map::session::{Collaborators, Session, SessionConfig, Storage};
use muse_map::components::mind_map::state::MindMapState;
use muse_map::components::mind_map::storage::{BrowserClock, DownloadSink, LocalStorage, WindowPrompt};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn session(key: &str) -> Session {
	Session::new(
		MindMapState::new(800.0, 600.0, LayoutParams::default()),
		SessionConfig {
			storage_key: key.into(),
			..SessionConfig::default()
		},
		Collaborators {
			storage: Box::new(LocalStorage),
			files: Box::new(DownloadSink),
			prompt: Box::new(WindowPrompt),
			clock: Box::new(BrowserClock),
		},
		5,
	)
}

#[wasm_bindgen_test]
fn local_storage_set_get_remove() {
	let store = LocalStorage;
	store.set("muse-map-test-slot", "{}").unwrap();
	assert_eq!(store.get("muse-map-test-slot").unwrap().as_deref(), Some("{}"));
	store.remove("muse-map-test-slot").unwrap();
	assert_eq!(store.get("muse-map-test-slot").unwrap(), None);
}

#[wasm_bindgen_test]
fn session_survives_reload_through_local_storage() {
	let key = "muse-map-test-session";
	let mut first = session(key);
	first.generate("ocean").unwrap();
	assert!(first.save(false).unwrap());

	let mut second = session(key);
	assert!(second.restore());
	assert_eq!(second.state.graph, first.state.graph);

	assert!(second.clear_saved(false).unwrap());
	assert!(!session(key).restore());
}
