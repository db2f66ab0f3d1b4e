use std::rc::Rc;

use web_sys::CanvasRenderingContext2d;

use crate::graph::{Link, LinkIndex, NodeId};

/// Per-element decisions the canvas asks for on every frame. The canvas owns
/// layout and pointer handling; what each element looks like is up to the
/// caller.
#[derive(Clone)]
pub struct GraphStyle {
	/// Tooltip for the hovered node.
	pub node_label: Rc<dyn Fn(&str) -> Option<String>>,
	/// Tooltip for the hovered link.
	pub link_label: Rc<dyn Fn(LinkIndex, &Link) -> Option<String>>,
	/// Stroke and arrowhead colour.
	pub link_color: Rc<dyn Fn(LinkIndex) -> String>,
	/// Stroke width in screen pixels.
	pub link_width: Rc<dyn Fn(LinkIndex) -> f64>,
	/// Draws one node at its resolved graph coordinates `(x, y)`. The last
	/// argument is the current zoom factor.
	pub node_canvas_object: Rc<dyn Fn(&str, &CanvasRenderingContext2d, f64, f64, f64)>,
}

/// A press and release that did not move far enough to be a drag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerClick {
	/// On the node with this id.
	Node(NodeId),
	/// On empty canvas.
	Background,
}
