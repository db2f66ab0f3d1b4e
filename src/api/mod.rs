//! Typed client for the analysis service.
//!
//! `ApiClient` builds the endpoint URLs, encodes request bodies and decodes
//! responses. The bytes on the wire go through a [`Transport`], so the
//! request logic runs the same against the browser's fetch and against a
//! scripted transport in tests.

mod http;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::error::{RequestError, Result};
use crate::graph::GraphModel;

pub use http::HttpTransport;

/// A response as it came off the wire, before any interpretation.
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Reason phrase, e.g. `Internal Server Error`.
	pub status_text: String,
	/// Body as text, whatever the status.
	pub body: String,
}

impl RawResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Moves requests to the service and back.
///
/// Implementations only report transport failures; status codes are handed
/// back untouched in the [`RawResponse`].
#[async_trait(?Send)]
pub trait Transport {
	/// Issue a `GET` to `url`.
	async fn get(&self, url: Url) -> Result<RawResponse>;
	/// Issue a `POST` of `body` as JSON to `url`.
	async fn post_json(&self, url: Url, body: Value) -> Result<RawResponse>;
}

#[derive(Debug, Deserialize)]
struct ExtractBody {
	#[serde(default)]
	url: Option<String>,
	#[serde(default)]
	length: Option<usize>,
	#[serde(default)]
	text: Option<String>,
}

/// Text pulled out of a web page by the service.
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
	/// Address the text came from, as reported by the service.
	pub url: String,
	/// Length of `text` in characters.
	pub length: usize,
	/// The readable text; empty when the page had none.
	pub text: String,
}

/// Spending report the service attaches when it enforces a budget.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BudgetInfo {
	/// Billing month, `YYYY-MM`.
	pub month: String,
	/// Spent so far this month.
	pub spent_usd: f64,
	/// Monthly limit.
	pub budget_usd: f64,
	/// Whether requests are refused once the limit is reached.
	pub hard_cap_active: bool,
}

#[derive(Debug, Deserialize)]
struct AnalyzeBody {
	#[serde(flatten)]
	graph: GraphModel,
	#[serde(default)]
	provider: Option<String>,
	#[serde(default)]
	budget: Option<BudgetInfo>,
}

/// A successful analysis: the new graph and what the service says about it.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
	/// The extracted knowledge graph.
	pub graph: GraphModel,
	/// Provider the service actually used, which may not be the one asked for.
	pub provider: String,
	/// Spending report, when the service sent one.
	pub budget: Option<BudgetInfo>,
}

/// What `GET /health` says about the service.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ServiceHealth {
	/// Service reports itself healthy.
	#[serde(default)]
	pub ok: bool,
	/// Deployment environment name.
	#[serde(default)]
	pub env: String,
	/// Provider the service falls back to when none is requested.
	#[serde(default)]
	pub provider: String,
	/// Configured monthly budget in USD.
	#[serde(default)]
	pub budget: f64,
}

/// Client for the analysis service rooted at one base address.
#[derive(Clone, Debug)]
pub struct ApiClient<T> {
	base: String,
	transport: T,
}

impl<T: Transport> ApiClient<T> {
	/// Client for the service at `base`, talking through `transport`.
	pub fn new(base: impl Into<String>, transport: T) -> Self {
		Self {
			base: base.into(),
			transport,
		}
	}

	/// The configured base address.
	pub fn base(&self) -> &str {
		&self.base
	}

	fn endpoint(&self, path: &str) -> Result<Url> {
		// Trailing slash so `join` appends below any path prefix in the base.
		let base = Url::parse(&format!("{}/", self.base.trim_end_matches('/')))?;
		Ok(base.join(path)?)
	}

	/// `POST /extract`.
	pub async fn extract(&self, url: &str) -> Result<Extraction> {
		let endpoint = self.endpoint("extract")?;
		let raw = self.transport.post_json(endpoint, json!({ "url": url })).await?;
		let body: ExtractBody = decode(&raw)?;
		let text = body.text.unwrap_or_default();
		Ok(Extraction {
			url: body.url.unwrap_or_else(|| url.to_string()),
			length: body.length.unwrap_or_else(|| text.chars().count()),
			text,
		})
	}

	/// `POST /analyze?provider=...`.
	pub async fn analyze(&self, text: &str, provider: &str) -> Result<Analysis> {
		let mut endpoint = self.endpoint("analyze")?;
		endpoint.query_pairs_mut().append_pair("provider", provider);
		let raw = self.transport.post_json(endpoint, json!({ "text": text })).await?;
		let body: AnalyzeBody = decode(&raw)?;
		Ok(Analysis {
			graph: body.graph,
			provider: body.provider.unwrap_or_default(),
			budget: body.budget,
		})
	}

	/// `GET /health`.
	pub async fn health(&self) -> Result<ServiceHealth> {
		let endpoint = self.endpoint("health")?;
		let raw = self.transport.get(endpoint).await?;
		decode(&raw)
	}
}

fn decode<B: DeserializeOwned>(raw: &RawResponse) -> Result<B> {
	if !raw.is_success() {
		return Err(RequestError::Service {
			status: raw.status,
			status_text: raw.status_text.clone(),
			body: raw.body.clone(),
		});
	}
	Ok(serde_json::from_str(&raw.body)?)
}
