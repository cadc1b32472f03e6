use leptos::prelude::*;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<h1>"Nothing here"</h1>
		<p>"The page you are looking for does not exist."</p>
		<a href="/">"Back to the map"</a>
	}
}
