//! Shared harness: a scripted transport that answers from a queue and
//! records every request it is handed, and a gated transport whose replies
//! the test releases one by one.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::Value;
use url::Url;

use knowledge_graph_canvas::api::{ApiClient, RawResponse, Transport};
use knowledge_graph_canvas::config::ClientConfig;
use knowledge_graph_canvas::error::{RequestError, Result};
use knowledge_graph_canvas::orchestrator::RequestOrchestrator;
use knowledge_graph_canvas::state::AppState;

pub const BASE: &str = "http://kg.test";

#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
	pub method: &'static str,
	pub url: Url,
	pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct ScriptedTransport {
	replies: Rc<RefCell<VecDeque<Result<RawResponse>>>>,
	requests: Rc<RefCell<Vec<Recorded>>>,
}

impl ScriptedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn reply(self, reply: Result<RawResponse>) -> Self {
		self.replies.borrow_mut().push_back(reply);
		self
	}

	pub fn requests(&self) -> Vec<Recorded> {
		self.requests.borrow().clone()
	}

	fn next(&self, method: &'static str, url: Url, body: Option<Value>) -> Result<RawResponse> {
		self.requests.borrow_mut().push(Recorded { method, url, body });
		self.replies
			.borrow_mut()
			.pop_front()
			.unwrap_or_else(|| Err(RequestError::Transport("no scripted reply".into())))
	}
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
	async fn get(&self, url: Url) -> Result<RawResponse> {
		self.next("GET", url, None)
	}

	async fn post_json(&self, url: Url, body: Value) -> Result<RawResponse> {
		self.next("POST", url, Some(body))
	}
}

type Pending = (Recorded, oneshot::Sender<Result<RawResponse>>);

/// Holds every request open until the test answers it, so replies can arrive
/// in any order.
#[derive(Clone, Default)]
pub struct GatedTransport {
	pending: Rc<RefCell<Vec<Pending>>>,
	requests: Rc<RefCell<Vec<Recorded>>>,
}

impl GatedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn requests(&self) -> Vec<Recorded> {
		self.requests.borrow().clone()
	}

	/// Requests issued but not answered yet.
	pub fn waiting(&self) -> Vec<Recorded> {
		self.pending.borrow().iter().map(|(r, _)| r.clone()).collect()
	}

	/// Answer the open request whose JSON body is `body`.
	pub fn answer(&self, body: Value, reply: Result<RawResponse>) {
		let mut pending = self.pending.borrow_mut();
		let pos = pending
			.iter()
			.position(|(r, _)| r.body.as_ref() == Some(&body))
			.unwrap_or_else(|| panic!("no open request with body {body}"));
		let (_, tx) = pending.remove(pos);
		let _ = tx.send(reply);
	}

	async fn wait(&self, method: &'static str, url: Url, body: Option<Value>) -> Result<RawResponse> {
		let recorded = Recorded { method, url, body };
		let (tx, rx) = oneshot::channel();
		self.requests.borrow_mut().push(recorded.clone());
		self.pending.borrow_mut().push((recorded, tx));
		rx.await
			.unwrap_or_else(|_| Err(RequestError::Transport("gate dropped".into())))
	}
}

#[async_trait(?Send)]
impl Transport for GatedTransport {
	async fn get(&self, url: Url) -> Result<RawResponse> {
		self.wait("GET", url, None).await
	}

	async fn post_json(&self, url: Url, body: Value) -> Result<RawResponse> {
		self.wait("POST", url, Some(body)).await
	}
}

pub fn ok(body: Value) -> Result<RawResponse> {
	Ok(RawResponse {
		status: 200,
		status_text: "OK".into(),
		body: body.to_string(),
	})
}

pub fn status(code: u16, text: &str, body: &str) -> Result<RawResponse> {
	Ok(RawResponse {
		status: code,
		status_text: text.into(),
		body: body.into(),
	})
}

pub fn unreachable(msg: &str) -> Result<RawResponse> {
	Err(RequestError::Transport(msg.into()))
}

pub fn orchestrator<T: Transport + Clone>(transport: &T) -> RequestOrchestrator<T> {
	RequestOrchestrator::new(ApiClient::new(BASE, transport.clone()))
}

pub fn fresh_state() -> RefCell<AppState> {
	RefCell::new(AppState::new(&ClientConfig::default()))
}
