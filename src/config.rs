//! Static client configuration: service address, offered providers and the
//! text the editor starts with.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of the analysis service when nothing overrides it.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

const SAMPLE_TEXT: &str = "Microsoft invirtió en OpenAI. OpenAI creó GPT-4.";

/// Backend engine the analysis service is asked to use.
///
/// The service decides which providers actually work; the client only offers
/// the choices and reports back whatever the service says it used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
	/// Hosted OpenAI models.
	#[default]
	OpenAi,
	/// A local Ollama server.
	Ollama,
}

impl Provider {
	/// Every option offered by the provider selector, in display order.
	pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Ollama];

	/// Wire value sent as the `provider` query parameter.
	pub fn as_str(self) -> &'static str {
		match self {
			Provider::OpenAi => "openai",
			Provider::Ollama => "ollama",
		}
	}

	/// Human-facing option label.
	pub fn label(self) -> &'static str {
		match self {
			Provider::OpenAi => "OpenAI",
			Provider::Ollama => "Ollama",
		}
	}

	/// Parse a selector value; anything that is not an offered option is `None`.
	pub fn parse(value: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|p| p.as_str() == value)
	}
}

impl fmt::Display for Provider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Client configuration. Everything here is static; there is no persisted
/// state and nothing is read from the environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Base address of the analysis service, without trailing path.
	pub api_base: String,
	/// Provider selected when the page loads.
	pub default_provider: Provider,
	/// Options shown in the provider selector.
	pub providers: Vec<Provider>,
	/// Initial content of the text editor.
	pub sample_text: String,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.to_string(),
			default_provider: Provider::default(),
			providers: Provider::ALL.to_vec(),
			sample_text: SAMPLE_TEXT.to_string(),
		}
	}
}

impl ClientConfig {
	/// Build a configuration from an embedded JSON document. Missing keys keep
	/// their defaults.
	pub fn from_json(raw: &str) -> serde_json::Result<Self> {
		serde_json::from_str(raw)
	}
}
