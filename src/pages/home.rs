use std::f64::consts::PI;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;
use web_sys::CanvasRenderingContext2d;

use crate::api::{ApiClient, HttpTransport};
use crate::components::control_panel::ControlPanel;
use crate::components::force_graph::{ForceGraphCanvas, GraphStyle};
use crate::config::ClientConfig;
use crate::graph::{Link, LinkIndex, NodeId};
use crate::orchestrator::RequestOrchestrator;
use crate::state::{Action, AppState, Store};
use crate::surface::{self, NodeStyle};

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	id: &str,
	x: f64,
	y: f64,
	global_scale: f64,
	style: &NodeStyle,
) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, style.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(style.color);
	ctx.fill();

	if style.show_label {
		ctx.set_font(&format!("{}px sans-serif", surface::label_font_px(global_scale)));
		ctx.set_fill_style_str(surface::LABEL_COLOR);
		let _ = ctx.fill_text(id, x + 10.0, y + 3.0);
	}
}

/// Style callbacks read the highlight untracked: they run inside the canvas
/// frame loop, not in a reactive scope.
fn graph_style(store: RwSignal<AppState>) -> GraphStyle {
	GraphStyle {
		node_label: Rc::new(|id: &str| Some(id.to_string())),
		link_label: Rc::new(|_: LinkIndex, link: &Link| {
			(!link.relation.is_empty()).then(|| link.relation.clone())
		}),
		link_color: Rc::new(move |idx: LinkIndex| {
			store.with_untracked(|s| surface::link_style(&s.highlight, idx).color.to_string())
		}),
		link_width: Rc::new(move |idx: LinkIndex| {
			store.with_untracked(|s| surface::link_style(&s.highlight, idx).width)
		}),
		node_canvas_object: Rc::new(
			move |id: &str, ctx: &CanvasRenderingContext2d, x: f64, y: f64, scale: f64| {
				let style = store.with_untracked(|s| surface::node_style(&s.highlight, id));
				draw_node(ctx, id, x, y, scale, &style);
			},
		),
	}
}

/// Settings embedded in the page as `<script id="kg-config" type="application/json">`.
fn page_config() -> ClientConfig {
	let raw = window()
		.document()
		.and_then(|doc| doc.get_element_by_id("kg-config"))
		.and_then(|el| el.text_content());
	match raw {
		Some(raw) => ClientConfig::from_json(&raw).unwrap_or_else(|err| {
			warn!("ignoring malformed page config: {err}");
			ClientConfig::default()
		}),
		None => ClientConfig::default(),
	}
}

/// Text/URL in, knowledge graph out.
#[component]
pub fn Home() -> impl IntoView {
	let config = page_config();
	let store = RwSignal::new(AppState::new(&config));
	let orchestrator = StoredValue::new_local(RequestOrchestrator::new(ApiClient::new(
		config.api_base.clone(),
		HttpTransport::new(),
	)));

	spawn_local(async move {
		let orchestrator = orchestrator.get_value();
		orchestrator.check_health(&store).await;
	});

	let on_extract = Callback::new(move |_: ()| {
		let url = store.with_untracked(|s| s.url.clone());
		let orchestrator = orchestrator.get_value();
		spawn_local(async move {
			let _ = orchestrator.extract_from_url(&store, &url).await;
		});
	});

	let on_analyze_url = Callback::new(move |_: ()| {
		let (url, provider) = store.with_untracked(|s| (s.url.clone(), s.provider));
		let orchestrator = orchestrator.get_value();
		spawn_local(async move {
			let _ = orchestrator
				.extract_and_analyze(&store, &url, provider.as_str())
				.await;
		});
	});

	let on_analyze_text = Callback::new(move |_: ()| {
		let (text, provider) = store.with_untracked(|s| (s.text.clone(), s.provider));
		let orchestrator = orchestrator.get_value();
		spawn_local(async move {
			let _ = orchestrator
				.analyze_text(&store, &text, provider.as_str())
				.await;
		});
	});

	let on_node_click = Callback::new(move |id: NodeId| store.dispatch(Action::SelectNode(id)));
	let on_background_click = Callback::new(move |_: ()| store.dispatch(Action::ClearSelection));

	let graph = Memo::new(move |_| store.with(|s| s.graph.clone()));

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

			<div class="workspace">
				<aside class="side-panel">
					<h2>"Knowledge Graph Visualizer"</h2>
					<p class="subtitle">"Paste text → analyze → interactive graph"</p>
					<ControlPanel
						store=store
						providers=config.providers.clone()
						api_base=config.api_base.clone()
						on_extract=on_extract
						on_analyze_url=on_analyze_url
						on_analyze_text=on_analyze_text
					/>
				</aside>
				<div class="graph-area">
					<ForceGraphCanvas
						data=graph
						style=graph_style(store)
						on_node_click=on_node_click
						on_background_click=on_background_click
					/>
				</div>
			</div>
		</ErrorBoundary>
	}
}
