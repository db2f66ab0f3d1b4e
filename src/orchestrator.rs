//! Sequencing of service calls and the status bookkeeping around them.
//!
//! Every operation follows the same shape: blank input returns early without
//! touching any status; otherwise the operation begins (status `Running`,
//! visible error cleared), awaits exactly one service call, and settles to
//! `Idle` or `Failed` with nothing fallible in between. A settled invocation
//! can therefore never leave its status `Running`.

use log::{debug, info, warn};

use crate::api::{ApiClient, Transport};
use crate::error::{RequestError, Result};
use crate::graph::GraphModel;
use crate::state::{Action, Operation, Store};

const EXTRACT_FALLBACK: &str = "error extracting URL";
const ANALYZE_FALLBACK: &str = "unknown error";

/// Runs the service operations against a [`Store`], one status per operation.
#[derive(Clone, Debug)]
pub struct RequestOrchestrator<T> {
	api: ApiClient<T>,
}

impl<T: Transport> RequestOrchestrator<T> {
	/// Orchestrator issuing its requests through `api`.
	pub fn new(api: ApiClient<T>) -> Self {
		Self { api }
	}

	/// Fetch the readable text of `url`. The text is mirrored into the editor
	/// on success and also returned; the graph is not touched. A result that
	/// arrives after a newer extraction began is discarded and reported as
	/// [`RequestError::Superseded`].
	pub async fn extract_from_url<S: Store>(&self, store: &S, url: &str) -> Result<String> {
		let url = url.trim();
		if url.is_empty() {
			debug!("ignoring extract with blank url");
			return Err(RequestError::EmptyInput("url"));
		}

		let ticket = store.begin(Operation::Extract);
		info!("extracting {url}");
		match self.api.extract(url).await {
			Ok(extraction) => {
				info!("extracted {} characters from {}", extraction.length, extraction.url);
				let text = extraction.text.clone();
				if !store.settle(Action::Extracted { ticket, extraction }) {
					return Err(RequestError::Superseded);
				}
				Ok(text)
			}
			Err(err) => {
				warn!("extract failed: {err}");
				store.settle(Action::Failed {
					ticket,
					message: message(&err, EXTRACT_FALLBACK),
				});
				Err(err)
			}
		}
	}

	/// Analyse `text` with `provider`. On success the returned graph replaces
	/// the current one; on failure, or when a newer analysis began meanwhile,
	/// the current graph stays as it was.
	pub async fn analyze_text<S: Store>(
		&self,
		store: &S,
		text: &str,
		provider: &str,
	) -> Result<GraphModel> {
		if text.trim().is_empty() {
			debug!("ignoring analyze with blank text");
			return Err(RequestError::EmptyInput("text"));
		}

		let ticket = store.begin(Operation::Analyze);
		info!("analyzing {} characters with {provider}", text.chars().count());
		match self.api.analyze(text, provider).await {
			Ok(analysis) => {
				info!(
					"graph has {} nodes and {} links (provider {:?})",
					analysis.graph.nodes.len(),
					analysis.graph.links.len(),
					analysis.provider
				);
				let graph = analysis.graph.clone();
				if !store.settle(Action::Analyzed { ticket, analysis }) {
					return Err(RequestError::Superseded);
				}
				Ok(graph)
			}
			Err(err) => {
				warn!("analyze failed: {err}");
				store.settle(Action::Failed {
					ticket,
					message: message(&err, ANALYZE_FALLBACK),
				});
				Err(err)
			}
		}
	}

	/// Extract `url`, then analyse exactly the text that extraction returned.
	///
	/// The analysis input is the extraction's return value, never the editor
	/// contents, which may not reflect the extraction yet. A superseded
	/// extraction stops here: no analysis is started for it.
	pub async fn extract_and_analyze<S: Store>(
		&self,
		store: &S,
		url: &str,
		provider: &str,
	) -> Result<GraphModel> {
		let text = self.extract_from_url(store, url).await?;
		self.analyze_text(store, &text, provider).await
	}

	/// Ask the service how it is configured. Failures are only logged.
	pub async fn check_health<S: Store>(&self, store: &S) {
		match self.api.health().await {
			Ok(health) => {
				info!(
					"service ok={} env={} default provider={}",
					health.ok, health.env, health.provider
				);
				store.dispatch(Action::HealthChecked(health));
			}
			Err(err) => warn!("health check against {} failed: {err}", self.api.base()),
		}
	}
}

fn message(err: &RequestError, fallback: &str) -> String {
	let msg = err.to_string();
	if msg.trim().is_empty() {
		fallback.to_string()
	} else {
		msg
	}
}
