//! The single UI state container and the reducer that is its only writer.
//!
//! Everything the page shows lives in [`AppState`]. Changes go through
//! [`AppState::apply`], fed by [`Store::dispatch`]; reads take a snapshot
//! through [`Store::snapshot`]. On the single-threaded event loop nothing else can
//! run between two dispatches, so no locking is involved.

use std::cell::RefCell;

use leptos::prelude::*;
use log::debug;

use crate::api::{Analysis, BudgetInfo, Extraction, ServiceHealth};
use crate::config::{ClientConfig, Provider};
use crate::graph::{GraphModel, HighlightState, NodeId, compute_highlight};

/// The two service operations tracked by the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Text extraction from a URL.
	Extract,
	/// Graph extraction from text.
	Analyze,
}

/// Where an operation stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OperationStatus {
	/// Not started, or last run succeeded.
	#[default]
	Idle,
	/// A request is in flight.
	Running,
	/// Last run failed with this message.
	Failed(String),
}

impl OperationStatus {
	/// Whether a request is in flight.
	pub fn is_running(&self) -> bool {
		matches!(self, OperationStatus::Running)
	}
}

/// Status plus the generation of the newest invocation of one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationState {
	/// Visible status.
	pub status: OperationStatus,
	generation: u64,
}

/// Proof of which invocation a settlement belongs to. Only the ticket of the
/// newest invocation of an operation may settle it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
	/// Operation the invocation belongs to.
	pub op: Operation,
	generation: u64,
}

/// Last successful extraction, without the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractSummary {
	/// Address the text came from.
	pub url: String,
	/// Character count of the text.
	pub length: usize,
}

/// Everything the page shows.
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
	/// Editor contents.
	pub text: String,
	/// URL field contents.
	pub url: String,
	/// Provider picked in the selector.
	pub provider: Provider,
	/// Provider the service reported for the current graph.
	pub used_provider: String,
	/// Current graph; replaced only by a successful analysis.
	pub graph: GraphModel,
	/// Emphasis for the selected node.
	pub highlight: HighlightState,
	/// Extraction bookkeeping.
	pub extract: OperationState,
	/// Analysis bookkeeping.
	pub analyze: OperationState,
	/// The one error message shown to the user.
	pub error: Option<String>,
	/// Spending report that came with the current graph.
	pub budget: Option<BudgetInfo>,
	/// Last successful extraction.
	pub last_extract: Option<ExtractSummary>,
	/// Last successful health probe.
	pub health: Option<ServiceHealth>,
}

impl AppState {
	/// Initial state for a freshly loaded page.
	pub fn new(config: &ClientConfig) -> Self {
		Self {
			text: config.sample_text.clone(),
			url: String::new(),
			provider: config.default_provider,
			used_provider: String::new(),
			graph: GraphModel::default(),
			highlight: HighlightState::default(),
			extract: OperationState::default(),
			analyze: OperationState::default(),
			error: None,
			budget: None,
			last_extract: None,
			health: None,
		}
	}

	/// Bookkeeping of `op`.
	pub fn operation(&self, op: Operation) -> &OperationState {
		match op {
			Operation::Extract => &self.extract,
			Operation::Analyze => &self.analyze,
		}
	}

	fn operation_mut(&mut self, op: Operation) -> &mut OperationState {
		match op {
			Operation::Extract => &mut self.extract,
			Operation::Analyze => &mut self.analyze,
		}
	}

	/// Visible status of `op`.
	pub fn status(&self, op: Operation) -> &OperationStatus {
		&self.operation(op).status
	}

	/// Ticket of the newest invocation of `op`.
	pub fn ticket(&self, op: Operation) -> Ticket {
		Ticket {
			op,
			generation: self.operation(op).generation,
		}
	}

	/// Whether `ticket` still belongs to the newest invocation of its operation.
	pub fn is_current(&self, ticket: Ticket) -> bool {
		self.operation(ticket.op).generation == ticket.generation
	}

	/// The reducer. Settlements with a stale ticket are dropped whole.
	pub fn apply(&mut self, action: Action) {
		match action {
			Action::EditText(text) => self.text = text,
			Action::EditUrl(url) => self.url = url,
			Action::ChooseProvider(provider) => self.provider = provider,
			Action::Begin(op) => {
				let state = self.operation_mut(op);
				state.generation += 1;
				state.status = OperationStatus::Running;
				self.error = None;
			}
			Action::Extracted { ticket, extraction } => {
				if !self.settle(ticket, OperationStatus::Idle) {
					return;
				}
				self.last_extract = Some(ExtractSummary {
					url: extraction.url,
					length: extraction.length,
				});
				self.text = extraction.text;
			}
			Action::Analyzed { ticket, analysis } => {
				if !self.settle(ticket, OperationStatus::Idle) {
					return;
				}
				self.graph = analysis.graph;
				self.used_provider = analysis.provider;
				self.budget = analysis.budget;
				self.highlight = HighlightState::default();
			}
			Action::Failed { ticket, message } => {
				if self.settle(ticket, OperationStatus::Failed(message.clone())) {
					self.error = Some(message);
				}
			}
			Action::SelectNode(id) => self.highlight = compute_highlight(&self.graph, &id),
			Action::ClearSelection => self.highlight = HighlightState::default(),
			Action::HealthChecked(health) => self.health = Some(health),
		}
	}

	fn settle(&mut self, ticket: Ticket, status: OperationStatus) -> bool {
		if !self.is_current(ticket) {
			debug!("dropping stale {:?} response", ticket.op);
			return false;
		}
		self.operation_mut(ticket.op).status = status;
		true
	}
}

/// Everything that can change [`AppState`].
#[derive(Clone, Debug)]
pub enum Action {
	/// The user typed in the editor.
	EditText(String),
	/// The user typed in the URL field.
	EditUrl(String),
	/// The user picked a provider.
	ChooseProvider(Provider),
	/// A new invocation of an operation starts; clears the visible error.
	Begin(Operation),
	/// An extraction succeeded.
	Extracted {
		/// Invocation being settled.
		ticket: Ticket,
		/// What the service returned.
		extraction: Extraction,
	},
	/// An analysis succeeded.
	Analyzed {
		/// Invocation being settled.
		ticket: Ticket,
		/// What the service returned.
		analysis: Analysis,
	},
	/// An operation failed.
	Failed {
		/// Invocation being settled.
		ticket: Ticket,
		/// Text shown to the user.
		message: String,
	},
	/// A node was clicked.
	SelectNode(NodeId),
	/// The empty canvas was clicked.
	ClearSelection,
	/// The health probe answered.
	HealthChecked(ServiceHealth),
}

impl Action {
	/// The invocation a settlement belongs to; `None` for everything else.
	pub fn ticket(&self) -> Option<Ticket> {
		match self {
			Action::Extracted { ticket, .. }
			| Action::Analyzed { ticket, .. }
			| Action::Failed { ticket, .. } => Some(*ticket),
			_ => None,
		}
	}
}

/// Holder of the [`AppState`] the page works on.
pub trait Store {
	/// Run `action` through the reducer.
	fn dispatch(&self, action: Action);
	/// Read the current state without subscribing to it.
	fn snapshot<R>(&self, f: impl FnOnce(&AppState) -> R) -> R;

	/// Start a new invocation of `op` and hand back its ticket.
	fn begin(&self, op: Operation) -> Ticket {
		self.dispatch(Action::Begin(op));
		self.snapshot(|s| s.ticket(op))
	}

	/// Dispatch a settlement. Returns `false` when a newer invocation of the
	/// same operation had already begun, in which case the reducer dropped it.
	fn settle(&self, action: Action) -> bool {
		let current = action
			.ticket()
			.is_none_or(|ticket| self.snapshot(|s| s.is_current(ticket)));
		self.dispatch(action);
		current
	}
}

impl Store for RefCell<AppState> {
	fn dispatch(&self, action: Action) {
		self.borrow_mut().apply(action);
	}

	fn snapshot<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
		f(&self.borrow())
	}
}

impl Store for RwSignal<AppState> {
	fn dispatch(&self, action: Action) {
		self.update(|s| s.apply(action));
	}

	fn snapshot<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
		self.with_untracked(f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{Link, Node};
	use pretty_assertions::assert_eq;

	fn state() -> AppState {
		AppState::new(&ClientConfig::default())
	}

	fn analysis(nodes: &[&str], provider: &str) -> Analysis {
		Analysis {
			graph: GraphModel {
				nodes: nodes.iter().map(|n| Node::new(*n)).collect(),
				links: vec![],
			},
			provider: provider.into(),
			budget: None,
		}
	}

	#[test]
	fn begin_marks_running_and_clears_error() {
		let mut s = state();
		s.error = Some("old".into());
		s.apply(Action::Begin(Operation::Analyze));
		assert!(s.status(Operation::Analyze).is_running());
		assert_eq!(s.status(Operation::Extract), &OperationStatus::Idle);
		assert_eq!(s.error, None);
	}

	#[test]
	fn failure_sets_status_and_visible_error() {
		let mut s = state();
		s.apply(Action::Begin(Operation::Extract));
		let ticket = s.ticket(Operation::Extract);
		s.apply(Action::Failed {
			ticket,
			message: "boom".into(),
		});
		assert_eq!(
			s.status(Operation::Extract),
			&OperationStatus::Failed("boom".into())
		);
		assert_eq!(s.error.as_deref(), Some("boom"));
	}

	#[test]
	fn stale_settlement_is_dropped() {
		let mut s = state();
		s.apply(Action::Begin(Operation::Analyze));
		let first = s.ticket(Operation::Analyze);
		s.apply(Action::Begin(Operation::Analyze));
		let second = s.ticket(Operation::Analyze);

		s.apply(Action::Analyzed {
			ticket: first,
			analysis: analysis(&["stale"], "openai"),
		});
		assert!(s.status(Operation::Analyze).is_running());
		assert!(s.graph.is_empty());

		s.apply(Action::Analyzed {
			ticket: second,
			analysis: analysis(&["fresh"], "ollama"),
		});
		assert_eq!(s.status(Operation::Analyze), &OperationStatus::Idle);
		assert_eq!(s.graph.nodes[0].id, "fresh");
		assert_eq!(s.used_provider, "ollama");
	}

	#[test]
	fn stale_failure_does_not_show_an_error() {
		let mut s = state();
		s.apply(Action::Begin(Operation::Extract));
		let first = s.ticket(Operation::Extract);
		s.apply(Action::Begin(Operation::Extract));
		s.apply(Action::Failed {
			ticket: first,
			message: "late".into(),
		});
		assert_eq!(s.error, None);
		assert!(s.status(Operation::Extract).is_running());
	}

	#[test]
	fn extraction_mirrors_text_and_records_summary() {
		let mut s = state();
		s.apply(Action::Begin(Operation::Extract));
		let ticket = s.ticket(Operation::Extract);
		s.apply(Action::Extracted {
			ticket,
			extraction: Extraction {
				url: "https://example.org".into(),
				length: 5,
				text: "hello".into(),
			},
		});
		assert_eq!(s.text, "hello");
		assert_eq!(
			s.last_extract,
			Some(ExtractSummary {
				url: "https://example.org".into(),
				length: 5
			})
		);
		assert!(s.graph.is_empty());
	}

	#[test]
	fn new_graph_resets_selection() {
		let mut s = state();
		s.graph = GraphModel {
			nodes: vec![Node::new("A"), Node::new("B")],
			links: vec![Link::new("A", "B", "r")],
		};
		s.apply(Action::SelectNode("A".into()));
		assert_eq!(s.highlight.links.len(), 1);

		s.apply(Action::Begin(Operation::Analyze));
		let ticket = s.ticket(Operation::Analyze);
		s.apply(Action::Analyzed {
			ticket,
			analysis: analysis(&["C"], "openai"),
		});
		assert!(s.highlight.is_empty());
	}

	#[test]
	fn background_click_clears_selection() {
		let mut s = state();
		s.graph = GraphModel {
			nodes: vec![Node::new("A"), Node::new("B")],
			links: vec![Link::new("A", "B", "r")],
		};
		s.apply(Action::SelectNode("B".into()));
		assert!(!s.highlight.is_empty());
		s.apply(Action::ClearSelection);
		assert_eq!(s.highlight, HighlightState::default());
	}

	#[test]
	fn store_begin_returns_current_ticket() {
		let store = RefCell::new(state());
		let t1 = store.begin(Operation::Extract);
		let t2 = store.begin(Operation::Extract);
		assert_ne!(t1, t2);
		assert_eq!(store.snapshot(|s| s.ticket(Operation::Extract)), t2);
	}

	#[test]
	fn store_settle_reports_superseded_tickets() {
		let store = RefCell::new(state());
		let first = store.begin(Operation::Extract);
		let second = store.begin(Operation::Extract);
		let extraction = |text: &str| Extraction {
			url: "https://example.org".into(),
			length: text.len(),
			text: text.into(),
		};

		assert!(!store.settle(Action::Extracted {
			ticket: first,
			extraction: extraction("old"),
		}));
		assert!(store.snapshot(|s| s.status(Operation::Extract).is_running()));

		assert!(store.settle(Action::Extracted {
			ticket: second,
			extraction: extraction("new"),
		}));
		assert_eq!(store.snapshot(|s| s.text.clone()), "new");
	}
}
