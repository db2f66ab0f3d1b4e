use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, LOOP_RADIUS, NODE_RADIUS};
use super::types::GraphStyle;

const BACKGROUND: &str = "#1a1a2e";
const ARROW_LENGTH: f64 = 6.0;

pub fn render(state: &ForceGraphState, style: &GraphStyle, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, style, ctx);
	draw_nodes(state, style, ctx);
	ctx.restore();
	draw_tooltip(state, style, ctx);
}

fn draw_links(state: &ForceGraphState, style: &GraphStyle, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap) = (8.0 / k, 4.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let positions = state.positions();

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let color = (style.link_color)(edge.link);
		ctx.set_stroke_style_str(&color);
		ctx.set_fill_style_str(&color);
		ctx.set_line_width((style.link_width)(edge.link) / k);

		if edge.source == edge.target {
			draw_loop(ctx, x1, y1);
		} else {
			draw_arrow(ctx, (x1, y1), (x2, y2), dash, gap, dash_offset);
		}
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// Dashed shaft plus solid head, trimmed to the node circles. Nothing is
/// drawn when both ends overlap.
fn draw_arrow(
	ctx: &CanvasRenderingContext2d,
	(x1, y1): (f64, f64),
	(x2, y2): (f64, f64),
	dash: f64,
	gap: f64,
	dash_offset: f64,
) {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);

	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(gap),
	));
	ctx.set_line_dash_offset(dash_offset);
	ctx.begin_path();
	ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
	ctx.line_to(
		x2 - ux * (NODE_RADIUS + ARROW_LENGTH),
		y2 - uy * (NODE_RADIUS + ARROW_LENGTH),
	);
	ctx.stroke();

	let _ = ctx.set_line_dash(&js_sys::Array::new());
	let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
	let (back_x, back_y) = (tip_x - ux * ARROW_LENGTH, tip_y - uy * ARROW_LENGTH);
	let (px, py) = (-uy * ARROW_LENGTH * 0.5, ux * ARROW_LENGTH * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_loop(ctx: &CanvasRenderingContext2d, x: f64, y: f64) {
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.begin_path();
	let _ = ctx.arc(x, y - NODE_RADIUS - LOOP_RADIUS, LOOP_RADIUS, 0.0, 2.0 * PI);
	ctx.stroke();
}

fn draw_nodes(state: &ForceGraphState, style: &GraphStyle, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	state.graph.visit_nodes(|node| {
		(style.node_canvas_object)(
			&node.data.user_data.id,
			ctx,
			node.x() as f64,
			node.y() as f64,
			k,
		);
	});
}

/// Label of the hovered node, or else of the hovered link, in screen space
/// next to the pointer.
fn draw_tooltip(state: &ForceGraphState, style: &GraphStyle, ctx: &CanvasRenderingContext2d) {
	let label = match (state.hover.node, state.hover.link) {
		(Some(idx), _) => state.node_id(idx).and_then(|id| (style.node_label)(id)),
		(None, Some(idx)) => state
			.model
			.link(idx)
			.and_then(|link| (style.link_label)(idx, link)),
		(None, None) => None,
	};
	let Some(label) = label else {
		return;
	};

	ctx.set_font("12px sans-serif");
	let width = ctx
		.measure_text(&label)
		.map(|m| m.width())
		.unwrap_or(label.len() as f64 * 7.0);
	let (x, y) = (state.hover.screen_x + 12.0, state.hover.screen_y + 12.0);

	ctx.set_fill_style_str("rgba(15, 23, 42, 0.9)");
	ctx.fill_rect(x, y, width + 12.0, 20.0);
	ctx.set_fill_style_str("white");
	let _ = ctx.fill_text(&label, x + 6.0, y + 14.0);
}
