use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::PointerClick;
use crate::graph::{GraphModel, LinkIndex, NodeId};

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;
/// Radius of the circle a self-loop is drawn as.
pub const LOOP_RADIUS: f64 = NODE_RADIUS * 1.6;
/// Screen distance from a link's stroke that still hovers it.
const LINK_HIT: f64 = 4.0;
/// Screen distance a press may travel and still count as a click.
const CLICK_SLOP: f64 = 3.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: NodeId,
}

/// A drawn link: simulation endpoints plus the link's identity in the model.
#[derive(Clone, Copy, Debug)]
pub struct EdgeInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub link: LinkIndex,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	/// Only set while no node is under the pointer.
	pub link: Option<LinkIndex>,
	pub screen_x: f64,
	pub screen_y: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	pub edges: Vec<EdgeInfo>,
	/// The model the simulation was last loaded from.
	pub model: GraphModel,
	ids: HashMap<DefaultNodeIdx, NodeId>,
	moved: bool,
}

fn simulation() -> SimulationParameters {
	SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

impl ForceGraphState {
	pub fn new(data: &GraphModel, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: ForceGraph::new(simulation()),
			edges: Vec::new(),
			model: GraphModel::default(),
			ids: HashMap::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
			moved: false,
		};
		state.load(data);
		state
	}

	/// Replace the simulated graph with `data`. Nodes whose id survives keep
	/// their position and pin; new nodes are seeded on a circle.
	pub fn load(&mut self, data: &GraphModel) {
		let mut previous: HashMap<NodeId, (f32, f32, bool)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			previous.insert(
				node.data.user_data.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});

		let mut graph = ForceGraph::new(simulation());
		let mut id_to_idx = HashMap::new();
		self.ids.clear();
		self.edges.clear();

		for (i, node) in data.nodes.iter().enumerate() {
			let (x, y, is_anchor) = previous.get(&node.id).copied().unwrap_or_else(|| {
				// Seeded around the origin, which the view transform centres.
				let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
				((100.0 * angle.cos()) as f32, (100.0 * angle.sin()) as f32, false)
			});
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: node.id.clone(),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
			self.ids.insert(idx, node.id.clone());
		}

		for (link_idx, link) in data.indexed_links() {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(link.source.id()),
				id_to_idx.get(link.target.id()),
			) {
				// Self-loops are drawn but exert no spring force.
				if src != tgt {
					graph.add_edge(src, tgt, EdgeData::default());
				}
				self.edges.push(EdgeInfo {
					source: src,
					target: tgt,
					link: link_idx,
				});
			}
		}

		self.graph = graph;
		self.model = data.clone();
		self.drag = DragState::default();
		self.hover.node = None;
		self.hover.link = None;
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<&NodeId> {
		self.ids.get(&idx)
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	/// The drawn link closest to a screen point, within a few pixels of its
	/// stroke.
	pub fn link_at_position(&self, sx: f64, sy: f64) -> Option<LinkIndex> {
		let point = self.screen_to_graph(sx, sy);
		let tolerance = LINK_HIT / self.transform.k;
		let positions = self.positions();
		let mut best: Option<(f64, LinkIndex)> = None;
		for edge in &self.edges {
			let (Some(&a), Some(&b)) = (positions.get(&edge.source), positions.get(&edge.target))
			else {
				continue;
			};
			let dist = if edge.source == edge.target {
				let centre = (a.0, a.1 - NODE_RADIUS - LOOP_RADIUS);
				(distance(point, centre) - LOOP_RADIUS).abs()
			} else {
				segment_distance(point, a, b)
			};
			if dist <= tolerance && best.is_none_or(|(d, _)| dist < d) {
				best = Some((dist, edge.link));
			}
		}
		best.map(|(_, link)| link)
	}

	pub fn press(&mut self, x: f64, y: f64) {
		self.moved = false;
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag.active = true;
			self.drag.node_idx = Some(idx);
			self.drag.start_x = x;
			self.drag.start_y = y;
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					self.drag.node_start_x = node.x();
					self.drag.node_start_y = node.y();
				}
			});
		} else {
			self.pan.active = true;
			self.pan.start_x = x;
			self.pan.start_y = y;
			self.pan.transform_start_x = self.transform.x;
			self.pan.transform_start_y = self.transform.y;
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		self.hover.screen_x = x;
		self.hover.screen_y = y;
		if !self.drag.active {
			self.hover.node = self.node_at_position(x, y);
			self.hover.link = match self.hover.node {
				Some(_) => None,
				None => self.link_at_position(x, y),
			};
		}

		if self.drag.active {
			let (sx, sy) = (x - self.drag.start_x, y - self.drag.start_y);
			if !self.moved && (sx * sx + sy * sy).sqrt() <= CLICK_SLOP {
				return;
			}
			self.moved = true;
			if let Some(idx) = self.drag.node_idx {
				let k = self.transform.k;
				let (nx, ny) = (
					self.drag.node_start_x + (sx / k) as f32,
					self.drag.node_start_y + (sy / k) as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if self.pan.active {
			let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
			if !self.moved && (dx * dx + dy * dy).sqrt() <= CLICK_SLOP {
				return;
			}
			self.moved = true;
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	/// End the current press. Returns what was clicked if the pointer did not
	/// travel; a dragged node stays pinned where it was dropped.
	pub fn release(&mut self) -> Option<PointerClick> {
		let click = if self.moved {
			None
		} else if self.drag.active {
			self.drag
				.node_idx
				.and_then(|idx| self.node_id(idx).cloned())
				.map(PointerClick::Node)
		} else if self.pan.active {
			Some(PointerClick::Background)
		} else {
			None
		};
		self.cancel();
		click
	}

	pub fn cancel(&mut self) {
		self.drag.active = false;
		self.drag.node_idx = None;
		self.pan.active = false;
		self.moved = false;
	}

	pub fn leave(&mut self) {
		self.cancel();
		self.hover.node = None;
		self.hover.link = None;
	}

	pub fn zoom(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

fn distance((ax, ay): (f64, f64), (bx, by): (f64, f64)) -> f64 {
	((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len2 = dx * dx + dy * dy;
	if len2 == 0.0 {
		return distance(p, a);
	}
	let t = (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0);
	distance(p, (a.0 + t * dx, a.1 + t * dy))
}
