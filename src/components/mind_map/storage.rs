//! Browser implementations of the session collaborators.

use std::time::Duration;

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url, Window};

use super::debounce::Scheduler;
use super::error::MindMapError;
use super::session::{Clock, FileSink, Storage, UserPrompt};

fn window() -> Result<Window, MindMapError> {
	web_sys::window().ok_or_else(|| MindMapError::Storage("no window".into()))
}

fn js_error(context: &str, err: JsValue) -> MindMapError {
	MindMapError::Storage(format!("{context}: {err:?}"))
}

/// `window.localStorage`.
pub struct LocalStorage;

impl LocalStorage {
	fn area(&self) -> Result<web_sys::Storage, MindMapError> {
		window()?
			.local_storage()
			.map_err(|e| js_error("localStorage unavailable", e))?
			.ok_or_else(|| MindMapError::Storage("localStorage disabled".into()))
	}
}

impl Storage for LocalStorage {
	fn get(&self, key: &str) -> Result<Option<String>, MindMapError> {
		self.area()?.get_item(key).map_err(|e| js_error("read failed", e))
	}

	fn set(&self, key: &str, value: &str) -> Result<(), MindMapError> {
		self.area()?.set_item(key, value).map_err(|e| js_error("write failed", e))
	}

	fn remove(&self, key: &str) -> Result<(), MindMapError> {
		self.area()?.remove_item(key).map_err(|e| js_error("remove failed", e))
	}
}

/// Offers the file as a download through a temporary object URL.
pub struct DownloadSink;

impl FileSink for DownloadSink {
	fn export(&self, file_name: &str, contents: &str) -> Result<(), MindMapError> {
		let document = window()?
			.document()
			.ok_or_else(|| MindMapError::Storage("no document".into()))?;

		let parts = js_sys::Array::of1(&JsValue::from_str(contents));
		let options = BlobPropertyBag::new();
		options.set_type("application/json");
		let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
			.map_err(|e| js_error("blob failed", e))?;
		let url = Url::create_object_url_with_blob(&blob).map_err(|e| js_error("object url failed", e))?;

		let anchor: HtmlAnchorElement = document
			.create_element("a")
			.map_err(|e| js_error("anchor failed", e))?
			.dyn_into()
			.map_err(|_| MindMapError::Storage("anchor cast failed".into()))?;
		anchor.set_href(&url);
		anchor.set_download(file_name);
		anchor.click();

		if let Err(e) = Url::revoke_object_url(&url) {
			warn!("could not revoke {url}: {e:?}");
		}
		Ok(())
	}
}

/// `confirm`, `prompt` and `alert` on the window.
pub struct WindowPrompt;

impl UserPrompt for WindowPrompt {
	fn confirm(&self, message: &str) -> bool {
		web_sys::window()
			.and_then(|w| w.confirm_with_message(message).ok())
			.unwrap_or(false)
	}

	fn edit_text(&self, current: &str) -> Option<String> {
		web_sys::window()?
			.prompt_with_message_and_default("Edit node text:", current)
			.ok()
			.flatten()
	}

	fn alert(&self, message: &str) {
		if let Some(w) = web_sys::window() {
			let _ = w.alert_with_message(message);
		}
	}
}

/// `Date.now()`.
pub struct BrowserClock;

impl Clock for BrowserClock {
	fn now_millis(&self) -> u64 {
		js_sys::Date::now() as u64
	}
}

/// A `setTimeout` id together with the callback it will run.
pub struct TimeoutHandle {
	id: Option<i32>,
	_callback: Closure<dyn FnMut()>,
}

/// Schedules tasks with `setTimeout`.
pub struct BrowserTimer;

impl Scheduler for BrowserTimer {
	type Handle = TimeoutHandle;

	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimeoutHandle {
		let mut task = Some(task);
		let callback = Closure::<dyn FnMut()>::new(move || {
			if let Some(task) = task.take() {
				task();
			}
		});
		let id = web_sys::window().and_then(|w| {
			w.set_timeout_with_callback_and_timeout_and_arguments_0(
				callback.as_ref().unchecked_ref(),
				delay.as_millis().min(i32::MAX as u128) as i32,
			)
			.map_err(|e| warn!("setTimeout failed: {e:?}"))
			.ok()
		});
		TimeoutHandle {
			id,
			_callback: callback,
		}
	}

	fn cancel(&self, handle: TimeoutHandle) {
		if let (Some(w), Some(id)) = (web_sys::window(), handle.id) {
			w.clear_timeout_with_handle(id);
		}
	}
}
