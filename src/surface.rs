//! Decisions the interaction surface makes from state: what the controls
//! look like and how each graph element is emphasised. No business logic,
//! and nothing here owns renderer state.

use crate::graph::{HighlightState, LinkIndex};
use crate::state::{AppState, Operation};

/// Colour of selected nodes and their links.
pub const EMPHASIS_COLOR: &str = "#60a5fa";
const LINK_COLOR: &str = "rgba(148,163,184,0.25)";
const NODE_COLOR: &str = "#94a3b8";
/// Node label text colour.
pub const LABEL_COLOR: &str = "#e5e7eb";

/// How one node is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Fill colour.
	pub color: &'static str,
	/// Radius in graph units.
	pub radius: f64,
	/// Draw the id next to the node.
	pub show_label: bool,
}

/// How one link is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkStyle {
	/// Stroke colour.
	pub color: &'static str,
	/// Stroke width in screen pixels.
	pub width: f64,
}

/// Emphasised when the node is part of the highlight.
pub fn node_style(highlight: &HighlightState, id: &str) -> NodeStyle {
	if highlight.has_node(id) {
		NodeStyle {
			color: EMPHASIS_COLOR,
			radius: 7.0,
			show_label: true,
		}
	} else {
		NodeStyle {
			color: NODE_COLOR,
			radius: 5.0,
			show_label: false,
		}
	}
}

/// Emphasised when the link is part of the highlight.
pub fn link_style(highlight: &HighlightState, idx: LinkIndex) -> LinkStyle {
	if highlight.has_link(idx) {
		LinkStyle {
			color: EMPHASIS_COLOR,
			width: 2.0,
		}
	} else {
		LinkStyle {
			color: LINK_COLOR,
			width: 1.0,
		}
	}
}

/// Node label font size in canvas units, constant on screen at any zoom.
pub fn label_font_px(global_scale: f64) -> f64 {
	12.0 / global_scale
}

/// Enabled state and captions of the submission controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Controls {
	/// Extract button is greyed out.
	pub extract_disabled: bool,
	/// Extract button caption.
	pub extract_label: &'static str,
	/// Analyze-URL button is greyed out.
	pub analyze_url_disabled: bool,
	/// Analyze-URL button caption.
	pub analyze_url_label: &'static str,
	/// Analyze-text button is greyed out.
	pub analyze_text_disabled: bool,
	/// Analyze-text button caption.
	pub analyze_text_label: &'static str,
}

/// Control affordances for the current state.
pub fn controls(state: &AppState) -> Controls {
	let extracting = state.status(Operation::Extract).is_running();
	let analyzing = state.status(Operation::Analyze).is_running();
	let no_url = state.url.trim().is_empty();
	let no_text = state.text.trim().is_empty();

	Controls {
		extract_disabled: no_url || extracting,
		extract_label: if extracting {
			"Extracting..."
		} else {
			"Extract URL → Text"
		},
		analyze_url_disabled: no_url || extracting || analyzing,
		analyze_url_label: if analyzing {
			"Analyzing..."
		} else {
			"Analyze URL → Graph"
		},
		analyze_text_disabled: analyzing || no_text,
		analyze_text_label: if analyzing {
			"Analyzing..."
		} else {
			"Analyze and draw graph"
		},
	}
}

/// One-line spending summary, e.g. `1.25 / 5.00 USD (2026-10)`.
pub fn budget_line(state: &AppState) -> Option<String> {
	state.budget.as_ref().map(|b| {
		let cap = if b.hard_cap_active { "" } else { ", not enforced" };
		format!(
			"{:.2} / {:.2} USD ({}{cap})",
			b.spent_usd, b.budget_usd, b.month
		)
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::BudgetInfo;
	use crate::config::ClientConfig;
	use crate::state::Action;

	fn state() -> AppState {
		AppState::new(&ClientConfig::default())
	}

	#[test]
	fn url_buttons_need_a_url() {
		let s = state();
		let c = controls(&s);
		assert!(c.extract_disabled);
		assert!(c.analyze_url_disabled);
		assert!(!c.analyze_text_disabled);
	}

	#[test]
	fn running_extract_blocks_both_url_actions() {
		let mut s = state();
		s.apply(Action::EditUrl("https://example.org".into()));
		assert!(!controls(&s).extract_disabled);

		s.apply(Action::Begin(Operation::Extract));
		let c = controls(&s);
		assert!(c.extract_disabled);
		assert!(c.analyze_url_disabled);
		assert!(!c.analyze_text_disabled);
		assert_eq!(c.extract_label, "Extracting...");
	}

	#[test]
	fn running_analyze_blocks_submission() {
		let mut s = state();
		s.apply(Action::EditUrl("https://example.org".into()));
		s.apply(Action::Begin(Operation::Analyze));
		let c = controls(&s);
		assert!(c.analyze_text_disabled);
		assert!(c.analyze_url_disabled);
		assert!(!c.extract_disabled);
		assert_eq!(c.analyze_text_label, "Analyzing...");
	}

	#[test]
	fn blank_text_disables_analyze() {
		let mut s = state();
		s.apply(Action::EditText("   ".into()));
		assert!(controls(&s).analyze_text_disabled);
	}

	#[test]
	fn emphasis_follows_highlight_sets() {
		let mut h = HighlightState::default();
		h.nodes.insert("A".into());
		h.links.insert(LinkIndex(1));

		assert_eq!(node_style(&h, "A").radius, 7.0);
		assert!(node_style(&h, "A").show_label);
		assert_eq!(node_style(&h, "B").color, NODE_COLOR);
		assert_eq!(link_style(&h, LinkIndex(1)).width, 2.0);
		assert_eq!(link_style(&h, LinkIndex(0)).color, LINK_COLOR);
	}

	#[test]
	fn budget_line_formats_spend() {
		let mut s = state();
		assert_eq!(budget_line(&s), None);
		s.budget = Some(BudgetInfo {
			month: "2026-10".into(),
			spent_usd: 1.25,
			budget_usd: 5.0,
			hard_cap_active: true,
		});
		assert_eq!(budget_line(&s).as_deref(), Some("1.25 / 5.00 USD (2026-10)"));
	}
}
