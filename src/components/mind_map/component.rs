use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, FileReader, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use super::debounce::Debouncer;
use super::error::MindMapError;
use super::layout::LayoutParams;
use super::render;
use super::session::{Collaborators, Session, SessionConfig};
use super::state::MindMapState;
use super::storage::{BrowserClock, BrowserTimer, DownloadSink, LocalStorage, WindowPrompt};

type SharedSession = Rc<RefCell<Option<Session>>>;

/// Session plus the bits of UI that mirror it.
#[derive(Clone)]
struct MapHandle {
	session: SharedSession,
	autosave: Rc<RefCell<Debouncer<BrowserTimer>>>,
	node_count: RwSignal<usize>,
	last_saved: RwSignal<String>,
}

impl MapHandle {
	/// Runs `f` on the session, then refreshes labels and queues any requested autosave.
	fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
		let result = self.session.borrow_mut().as_mut().map(f);
		self.sync();
		result
	}

	fn sync(&self) {
		let request = {
			let mut guard = self.session.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			self.node_count.set(s.node_count());
			self.last_saved.set(format_saved(s.last_saved()));
			s.take_autosave_request()
		};
		if let Some(delay) = request {
			let (session, last_saved) = (self.session.clone(), self.last_saved);
			self.autosave.borrow_mut().schedule(delay, move || {
				if let Some(s) = session.borrow_mut().as_mut() {
					s.autosave();
					last_saved.set(format_saved(s.last_saved()));
				}
			});
		}
	}
}

fn format_saved(saved_at: Option<u64>) -> String {
	match saved_at {
		Some(ms) => js_sys::Date::new(&JsValue::from_f64(ms as f64))
			.to_locale_time_string("en-US")
			.into(),
		None => "never".into(),
	}
}

fn container_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
		height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
	)
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Calls `frame` on every animation frame until `cancelled` is set.
fn run_until_cancelled(window: &Window, cancelled: Arc<AtomicBool>, mut frame: impl FnMut() + 'static) {
	let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let inner = slot.clone();
	*slot.borrow_mut() = Some(Closure::new(move || {
		if cancelled.load(Ordering::Relaxed) {
			info!("frame loop stopped");
			return;
		}
		frame();
		if let (Some(win), Some(cb)) = (web_sys::window(), inner.borrow().as_ref()) {
			let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}));
	if let Some(ref cb) = *slot.borrow() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

fn rng_seed() -> u64 {
	let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
	(js_sys::Date::now() as u64) ^ (noise << 20)
}

/// Toolbar plus a canvas filling its container (or `width` by `height` CSS
/// pixels when given). Restores the saved map on mount and animates until
/// unmounted.
#[component]
pub fn MindMapCanvas(
	/// Storage key, export prefix and autosave delays.
	#[prop(optional)]
	config: SessionConfig,
	/// Force constants for the layout.
	#[prop(optional)]
	params: LayoutParams,
	/// Fixed width in CSS pixels; follows the container when unset.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height in CSS pixels; follows the container when unset.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let seed_ref = NodeRef::<leptos::html::Input>::new();
	let file_ref = NodeRef::<leptos::html::Input>::new();

	let handle = MapHandle {
		session: Rc::new(RefCell::new(None)),
		autosave: Rc::new(RefCell::new(Debouncer::new(BrowserTimer))),
		node_count: RwSignal::new(0),
		last_saved: RwSignal::new("never".to_string()),
	};
	let (node_count, last_saved) = (handle.node_count, handle.last_saved);

	let cancelled = Arc::new(AtomicBool::new(false));
	let cancel_on_cleanup = cancelled.clone();
	on_cleanup(move || cancel_on_cleanup.store(true, Ordering::Relaxed));

	let window_listeners: Rc<RefCell<Vec<Closure<dyn FnMut(MouseEvent)>>>> = Rc::new(RefCell::new(Vec::new()));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let handle_init = handle.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if handle_init.session.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("no window, mind map disabled");
			return;
		};

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(other) => {
					warn!("canvas context is not 2d: {other:?}");
					return;
				}
			},
			_ => {
				warn!("2d context unavailable");
				return;
			}
		};

		let (w, h) = container_size(&canvas, width, height);
		render::fit_canvas(&canvas, &ctx, w, h, window.device_pixel_ratio());

		let mut session = Session::new(
			MindMapState::new(w, h, params.clone()),
			config.clone(),
			Collaborators {
				storage: Box::new(LocalStorage),
				files: Box::new(DownloadSink),
				prompt: Box::new(WindowPrompt),
				clock: Box::new(BrowserClock),
			},
			rng_seed(),
		);
		if session.restore() {
			info!("restored {} nodes from local storage", session.node_count());
		}
		*handle_init.session.borrow_mut() = Some(session);
		handle_init.sync();

		let (resize_handle, resize_canvas, resize_ctx) = (handle_init.clone(), canvas.clone(), ctx.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = container_size(&resize_canvas, width, height);
			let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
			render::fit_canvas(&resize_canvas, &resize_ctx, nw, nh, dpr);
			resize_handle.with(|s| s.state.resize(nw, nh));
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		// Moves and releases are tracked on the window so a drag ending
		// outside the canvas still lets go.
		let (move_handle, move_canvas) = (handle_init.clone(), canvas.clone());
		let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
			let (x, y) = pointer_position(&move_canvas, &ev);
			let dragging = move_handle
				.session
				.borrow()
				.as_ref()
				.is_some_and(|s| s.state.interaction.is_dragging());
			if dragging {
				move_handle.with(|s| s.pointer_move(x, y));
			} else if let Some(s) = move_handle.session.borrow_mut().as_mut() {
				s.pointer_move(x, y);
			}
		});
		let up_handle = handle_init.clone();
		let on_up = Closure::<dyn FnMut(MouseEvent)>::new(move |_: MouseEvent| {
			if let Some(s) = up_handle.session.borrow_mut().as_mut() {
				s.pointer_up();
			}
		});
		let _ = window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref());
		let _ = window.add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref());
		window_listeners.borrow_mut().extend([on_move, on_up]);

		let frame_session = handle_init.session.clone();
		run_until_cancelled(&window, cancelled.clone(), move || {
			if let Some(ref mut s) = *frame_session.borrow_mut() {
				s.state.tick();
				render::render(&s.state, &ctx);
			}
		});
	});

	let handle_md = handle.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(s) = handle_md.session.borrow_mut().as_mut() {
			s.pointer_down(x, y);
		}
	};

	let handle_dbl = handle.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = pointer_position(&canvas, &ev);
		handle_dbl.with(|s| s.edit_at(x, y));
	};

	let handle_gen = handle.clone();
	let generate = move || {
		let seed = seed_ref.get().map(|input| input.value()).unwrap_or_default();
		handle_gen.with(|s| {
			if let Err(e) = s.generate(&seed) {
				s.report(&e);
			}
		});
	};
	let generate_on_enter = generate.clone();
	let on_seed_keydown = move |ev: KeyboardEvent| {
		if ev.key() == "Enter" {
			generate_on_enter();
		}
	};

	let handle_save = handle.clone();
	let on_save = move |_: MouseEvent| {
		handle_save.with(|s| {
			if let Err(e) = s.save(true) {
				s.report(&e);
			}
		});
	};

	let handle_load = handle.clone();
	let on_load = move |_: MouseEvent| {
		handle_load.with(|s| {
			if let Err(e) = s.load() {
				s.report(&e);
			}
		});
	};

	let handle_export = handle.clone();
	let on_export = move |_: MouseEvent| {
		handle_export.with(|s| {
			if let Err(e) = s.export() {
				s.report(&e);
			}
		});
	};

	let handle_clear = handle.clone();
	let on_clear = move |_: MouseEvent| {
		handle_clear.with(|s| {
			if let Err(e) = s.clear_saved(true) {
				s.report(&e);
			}
		});
	};

	let running = RwSignal::new(true);
	let handle_pause = handle.clone();
	let on_toggle_animation = move |_: MouseEvent| {
		if let Some(now_running) = handle_pause.with(|s| s.state.toggle_animation()) {
			info!("layout {}", if now_running { "resumed" } else { "paused" });
			running.set(now_running);
		}
	};

	let on_import_click = move |_: MouseEvent| {
		if let Some(input) = file_ref.get() {
			input.click();
		}
	};

	let handle_import = handle.clone();
	let on_import_change = move |_: Event| {
		let Some(input) = file_ref.get() else {
			return;
		};
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		let reader = match FileReader::new() {
			Ok(reader) => reader,
			Err(e) => {
				warn!("FileReader unavailable: {e:?}");
				return;
			}
		};
		let (onload_handle, onload_reader) = (handle_import.clone(), reader.clone());
		let onload = Closure::once_into_js(move || {
			let contents = onload_reader.result().ok().and_then(|v| v.as_string());
			onload_handle.with(|s| {
				let result = contents
					.ok_or_else(|| MindMapError::Storage("could not read file".into()))
					.and_then(|text| s.import(&text));
				if let Err(e) = result {
					s.report(&e);
				}
			});
		});
		reader.set_onload(Some(onload.unchecked_ref()));
		if let Err(e) = reader.read_as_text(&file) {
			warn!("could not read {}: {e:?}", file.name());
		}
		input.set_value("");
	};

	view! {
		<div class="mind-map">
			<div class="mind-map-toolbar">
				<input
					node_ref=seed_ref
					type="text"
					class="seed-input"
					placeholder="Type a seed word..."
					on:keydown=on_seed_keydown
				/>
				<button on:click=move |_| generate()>"Generate"</button>
				<button on:click=on_save>"Save"</button>
				<button on:click=on_load>"Load"</button>
				<button on:click=on_export>"Export"</button>
				<button on:click=on_import_click>"Import"</button>
				<button on:click=on_clear>"Clear saved"</button>
				<button on:click=on_toggle_animation>
					{move || if running.get() { "Pause" } else { "Resume" }}
				</button>
				<input
					node_ref=file_ref
					type="file"
					accept="application/json,.json"
					style="display: none;"
					on:change=on_import_change
				/>
				<span class="mind-map-status">
					"Nodes: " {move || node_count.get()} " · Last saved: " {move || last_saved.get()}
				</span>
			</div>
			<div class="mind-map-stage">
				<canvas
					node_ref=canvas_ref
					class="mind-map-canvas"
					on:mousedown=on_mousedown
					on:dblclick=on_dblclick
					style="display: block; cursor: grab;"
				/>
			</div>
		</div>
	}
}
