//! In-memory knowledge graph as returned by the analysis service.

pub mod highlight;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use highlight::{HighlightState, compute_highlight};

/// Identity key of a node. Uniqueness is the service's job, not ours.
pub type NodeId = String;

/// A concept in the graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Identity and display label.
	pub id: NodeId,
	/// Fields the service or a renderer attached to the node. Carried as-is.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Node {
	/// Node with no extra fields.
	pub fn new(id: impl Into<NodeId>) -> Self {
		Self {
			id: id.into(),
			extra: Map::new(),
		}
	}
}

/// One end of a link: either a bare node id, or the node object itself once a
/// renderer has resolved it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
	/// As sent by the service.
	Id(NodeId),
	/// Replaced by the node it names.
	Resolved(Node),
}

impl Endpoint {
	/// The node id this endpoint points at, whichever form it is in.
	pub fn id(&self) -> &str {
		match self {
			Endpoint::Id(id) => id,
			Endpoint::Resolved(node) => &node.id,
		}
	}
}

impl From<&str> for Endpoint {
	fn from(id: &str) -> Self {
		Endpoint::Id(id.to_string())
	}
}

impl From<Node> for Endpoint {
	fn from(node: Node) -> Self {
		Endpoint::Resolved(node)
	}
}

/// A directed, labelled relation between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
	/// Where the relation starts.
	pub source: Endpoint,
	/// Where the relation points.
	pub target: Endpoint,
	/// Relation label, e.g. `invirtió en`.
	#[serde(default)]
	pub relation: String,
}

impl Link {
	/// Link from `source` to `target`.
	pub fn new(
		source: impl Into<Endpoint>,
		target: impl Into<Endpoint>,
		relation: impl Into<String>,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			relation: relation.into(),
		}
	}

	/// Whether either end of the link is the node `id`.
	pub fn touches(&self, id: &str) -> bool {
		self.source.id() == id || self.target.id() == id
	}
}

/// Position of a link inside its graph's `links`. Links are compared by this
/// identity, never by value: two links with identical fields are distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkIndex(pub usize);

/// Nodes and links of one analysis result. Replaced wholesale, never merged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphModel {
	/// All nodes.
	#[serde(default)]
	pub nodes: Vec<Node>,
	/// All links, in the order the service sent them.
	#[serde(default)]
	pub links: Vec<Link>,
}

impl GraphModel {
	/// No nodes and no links.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty()
	}

	/// The link at `idx`, if there is one.
	pub fn link(&self, idx: LinkIndex) -> Option<&Link> {
		self.links.get(idx.0)
	}

	/// Links paired with their identity.
	pub fn indexed_links(&self) -> impl Iterator<Item = (LinkIndex, &Link)> {
		self.links.iter().enumerate().map(|(i, l)| (LinkIndex(i), l))
	}
}
