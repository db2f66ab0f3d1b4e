use leptos::prelude::*;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Not found"</h1>
			<p class="subtitle">"There is nothing at this address."</p>
			<a href="/">"Back to the graph"</a>
		</div>
	}
}
