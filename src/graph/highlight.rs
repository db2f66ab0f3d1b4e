//! Ego-neighbourhood of a selected node: the node itself, every link incident
//! to it, and the other end of each of those links.

use std::collections::HashSet;

use super::{GraphModel, LinkIndex, NodeId};

/// Emphasis sets for the current selection. Empty sets mean nothing is selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightState {
	/// Emphasised nodes.
	pub nodes: HashSet<NodeId>,
	/// Emphasised links.
	pub links: HashSet<LinkIndex>,
}

impl HighlightState {
	/// Nothing is selected.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty()
	}

	/// Whether node `id` is emphasised.
	pub fn has_node(&self, id: &str) -> bool {
		self.nodes.contains(id)
	}

	/// Whether the link at `idx` is emphasised.
	pub fn has_link(&self, idx: LinkIndex) -> bool {
		self.links.contains(&idx)
	}
}

/// Recompute the highlight for `selected` from scratch.
///
/// The selected id is always emphasised, even if no link mentions it.
pub fn compute_highlight(graph: &GraphModel, selected: &str) -> HighlightState {
	let mut state = HighlightState::default();
	state.nodes.insert(selected.to_string());

	for (idx, link) in graph.indexed_links() {
		if !link.touches(selected) {
			continue;
		}
		state.links.insert(idx);
		state.nodes.insert(link.source.id().to_string());
		state.nodes.insert(link.target.id().to_string());
	}
	state
}
