use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use serde_json::Value;
use url::Url;

use super::{RawResponse, Transport};
use crate::error::{RequestError, Result};

/// [`Transport`] over `reqwest`, which uses the browser's fetch on wasm.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
	client: Client,
}

impl HttpTransport {
	/// Transport with a default `reqwest` client.
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
	async fn get(&self, url: Url) -> Result<RawResponse> {
		debug!("GET {url}");
		let res = self.client.get(url).send().await.map_err(transport)?;
		read(res).await
	}

	async fn post_json(&self, url: Url, body: Value) -> Result<RawResponse> {
		debug!("POST {url}");
		let res = self
			.client
			.post(url)
			.json(&body)
			.send()
			.await
			.map_err(transport)?;
		read(res).await
	}
}

async fn read(res: Response) -> Result<RawResponse> {
	let status = res.status();
	let body = res.text().await.map_err(transport)?;
	Ok(RawResponse {
		status: status.as_u16(),
		status_text: status.canonical_reason().unwrap_or_default().to_string(),
		body,
	})
}

fn transport(err: reqwest::Error) -> RequestError {
	RequestError::Transport(err.to_string())
}
