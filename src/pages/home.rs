use leptos::prelude::*;

use crate::components::mind_map::MindMapCanvas;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-map">
				<div class="map-overlay">
					<h1>"MuseMap"</h1>
					<p class="subtitle">
						"Grow a map from a word. Drag bubbles to rearrange, double-click to rename."
					</p>
				</div>
				<MindMapCanvas />
			</div>
		</ErrorBoundary>
	}
}
