use std::collections::HashSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use proptest::sample::Index;

use knowledge_graph_canvas::graph::{
	Endpoint, GraphModel, HighlightState, Link, LinkIndex, Node, compute_highlight,
};

fn set(ids: &[&str]) -> HashSet<String> {
	ids.iter().map(|s| s.to_string()).collect()
}

fn links(idx: &[usize]) -> HashSet<LinkIndex> {
	idx.iter().copied().map(LinkIndex).collect()
}

fn companies() -> GraphModel {
	GraphModel {
		nodes: ["OpenAI", "GPT-4", "Microsoft"].into_iter().map(Node::new).collect(),
		links: vec![
			Link::new("OpenAI", "GPT-4", "creó"),
			Link::new("Microsoft", "OpenAI", "invirtió en"),
		],
	}
}

#[test]
fn selecting_a_hub_pulls_in_both_neighbours() {
	let h = compute_highlight(&companies(), "OpenAI");
	assert_eq!(h.nodes, set(&["OpenAI", "GPT-4", "Microsoft"]));
	assert_eq!(h.links, links(&[0, 1]));
}

#[test]
fn selecting_a_leaf_stops_at_one_hop() {
	let h = compute_highlight(&companies(), "GPT-4");
	assert_eq!(h.nodes, set(&["GPT-4", "OpenAI"]));
	assert_eq!(h.links, links(&[0]));
}

#[test]
fn selection_cleared_is_the_empty_state() {
	assert!(HighlightState::default().is_empty());
	assert!(!compute_highlight(&companies(), "GPT-4").is_empty());
}

#[test]
fn resolved_endpoints_decode_from_service_json() {
	let graph: GraphModel = serde_json::from_str(
		r#"{
			"nodes": [{"id": "A", "x": 1.5}, {"id": "B"}],
			"links": [{"source": {"id": "A", "x": 1.5}, "target": "B", "relation": "r"}]
		}"#,
	)
	.unwrap();

	assert!(matches!(graph.links[0].source, Endpoint::Resolved(_)));
	assert!(matches!(graph.links[0].target, Endpoint::Id(_)));
	assert_eq!(compute_highlight(&graph, "A").nodes, set(&["A", "B"]));
}

fn graph_strategy() -> impl Strategy<Value = GraphModel> {
	(1usize..8)
		.prop_flat_map(|n| {
			let link = (0..n, 0..n, any::<bool>(), any::<bool>());
			(Just(n), prop::collection::vec(link, 0..16))
		})
		.prop_map(|(n, raw)| {
			let nodes: Vec<Node> = (0..n).map(|i| Node::new(format!("n{i}"))).collect();
			let end = |i: usize, resolved: bool| -> Endpoint {
				if resolved {
					Endpoint::Resolved(nodes[i].clone())
				} else {
					Endpoint::Id(nodes[i].id.clone())
				}
			};
			let links = raw
				.into_iter()
				.map(|(s, t, rs, rt)| Link::new(end(s, rs), end(t, rt), "rel"))
				.collect();
			GraphModel { nodes, links }
		})
}

fn as_ids(graph: &GraphModel) -> GraphModel {
	let mut g = graph.clone();
	for link in &mut g.links {
		link.source = Endpoint::Id(link.source.id().to_string());
		link.target = Endpoint::Id(link.target.id().to_string());
	}
	g
}

proptest! {
	#[test]
	fn selected_node_is_always_emphasised(graph in graph_strategy(), pick in any::<Index>()) {
		let selected = graph.nodes[pick.index(graph.nodes.len())].id.clone();
		let h = compute_highlight(&graph, &selected);
		prop_assert!(h.has_node(&selected));
	}

	#[test]
	fn links_are_emphasised_exactly_when_incident(graph in graph_strategy(), pick in any::<Index>()) {
		let selected = graph.nodes[pick.index(graph.nodes.len())].id.clone();
		let h = compute_highlight(&graph, &selected);
		for (i, link) in graph.links.iter().enumerate() {
			let incident = link.source.id() == selected || link.target.id() == selected;
			prop_assert_eq!(h.has_link(LinkIndex(i)), incident);
			if incident {
				prop_assert!(h.has_node(link.source.id()));
				prop_assert!(h.has_node(link.target.id()));
			}
		}
	}

	#[test]
	fn nodes_beyond_one_hop_stay_plain(graph in graph_strategy(), pick in any::<Index>()) {
		let selected = graph.nodes[pick.index(graph.nodes.len())].id.clone();
		let h = compute_highlight(&graph, &selected);
		for id in &h.nodes {
			let adjacent = id == &selected
				|| graph.links.iter().any(|l| {
					(l.source.id() == selected && l.target.id() == id)
						|| (l.target.id() == selected && l.source.id() == id)
				});
			prop_assert!(adjacent, "{} is not adjacent to {}", id, selected);
		}
	}

	#[test]
	fn recomputation_is_deterministic(graph in graph_strategy(), pick in any::<Index>()) {
		let selected = graph.nodes[pick.index(graph.nodes.len())].id.clone();
		prop_assert_eq!(compute_highlight(&graph, &selected), compute_highlight(&graph, &selected));
	}

	#[test]
	fn endpoint_form_does_not_matter(graph in graph_strategy(), pick in any::<Index>()) {
		let selected = graph.nodes[pick.index(graph.nodes.len())].id.clone();
		prop_assert_eq!(
			compute_highlight(&graph, &selected),
			compute_highlight(&as_ids(&graph), &selected)
		);
	}
}
