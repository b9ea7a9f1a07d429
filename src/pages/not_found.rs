use leptos::prelude::*;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Lost among the stars"</h1>
			<a href="/">"Return home"</a>
		</div>
	}
}
