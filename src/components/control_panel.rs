use leptos::prelude::*;
use log::warn;

use crate::config::Provider;
use crate::state::{Action, AppState, Store};
use crate::surface;

/// Inputs, submission buttons and status read-outs of the side panel.
///
/// Edits go straight into the store; submissions are handed to the page
/// through the three callbacks.
#[component]
pub fn ControlPanel(
	store: RwSignal<AppState>,
	providers: Vec<Provider>,
	#[prop(into)] api_base: String,
	on_extract: Callback<()>,
	on_analyze_url: Callback<()>,
	on_analyze_text: Callback<()>,
) -> impl IntoView {
	let controls = move || store.with(surface::controls);

	let on_provider = move |ev: leptos::ev::Event| {
		let value = event_target_value(&ev);
		match Provider::parse(&value) {
			Some(p) => store.dispatch(Action::ChooseProvider(p)),
			None => warn!("ignoring unknown provider option {value:?}"),
		}
	};

	view! {
		<div class="control-panel">
			<div class="field-row">
				<label>"Provider"</label>
				<select
					on:change=on_provider
					prop:value=move || store.with(|s| s.provider.as_str())
				>
					{providers
						.into_iter()
						.map(|p| view! { <option value=p.as_str()>{p.label()}</option> })
						.collect_view()}
				</select>
			</div>

			<div class="field">
				<label>"URL (optional)"</label>
				<input
					placeholder="https://..."
					prop:value=move || store.with(|s| s.url.clone())
					on:input=move |ev| store.dispatch(Action::EditUrl(event_target_value(&ev)))
				/>
				<div class="button-row">
					<button
						on:click=move |_| on_extract.run(())
						disabled=move || controls().extract_disabled
					>
						{move || controls().extract_label}
					</button>
					<button
						on:click=move |_| on_analyze_url.run(())
						disabled=move || controls().analyze_url_disabled
					>
						{move || controls().analyze_url_label}
					</button>
				</div>
				{move || {
					store
						.with(|s| s.last_extract.clone())
						.map(|e| {
							view! {
								<div class="hint">
									{format!("Extracted {} characters from {}", e.length, e.url)}
								</div>
							}
						})
				}}
			</div>

			<textarea
				rows=10
				prop:value=move || store.with(|s| s.text.clone())
				on:input=move |ev| store.dispatch(Action::EditText(event_target_value(&ev)))
			/>

			<button
				on:click=move |_| on_analyze_text.run(())
				disabled=move || controls().analyze_text_disabled
			>
				{move || controls().analyze_text_label}
			</button>

			<Show when=move || store.with(|s| !s.used_provider.is_empty())>
				<div class="hint">
					"Provider used: " <b>{move || store.with(|s| s.used_provider.clone())}</b>
				</div>
			</Show>

			<div class="hint">
				{move || {
					store
						.with(|s| {
							format!("{} nodes, {} links", s.graph.nodes.len(), s.graph.links.len())
						})
				}}
			</div>

			{move || {
				store
					.with(surface::budget_line)
					.map(|line| view! { <div class="hint">"Budget: " {line}</div> })
			}}

			{move || {
				store
					.with(|s| s.error.clone())
					.map(|e| {
						view! {
							<div class="error">
								<b>"Error: "</b>
								{e}
							</div>
						}
					})
			}}

			<div class="hint">
				"Backend: " {api_base}
				{move || {
					store
						.with(|s| s.health.clone())
						.map(|h| format!(" ({}, default provider {})", h.env, h.provider))
				}}
			</div>
		</div>
	}
}
