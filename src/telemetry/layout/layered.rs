use std::collections::{HashMap, HashSet};

use super::super::types::{Edge, Point, Snapshot};

/// Node ids sharing one topological depth, in placement order.
pub type GraphLayer = Vec<String>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayeredLayout {
	pub layers: Vec<GraphLayer>,
	/// Positions centered on x = 0, first layer at y = 0.
	pub positions: Vec<(String, Point)>,
	/// Nodes that never reached in-degree zero, i.e. sit on or behind a cycle.
	pub unplaced: Vec<String>,
}

/// Snapshot entities in order, then edge endpoints not listed as entities in
/// order of first appearance.
pub fn node_order(snapshot: &Snapshot) -> Vec<String> {
	let mut seen: HashSet<&str> = HashSet::new();
	let mut order = Vec::new();
	let endpoints = snapshot
		.edges
		.iter()
		.flat_map(|edge| [edge.source.as_str(), edge.target.as_str()]);
	for id in snapshot.entities.iter().map(|e| e.id.as_str()).chain(endpoints) {
		if seen.insert(id) {
			order.push(id.to_string());
		}
	}
	order
}

/// Kahn's algorithm, peeling the zero in-degree frontier one layer at a time.
pub fn assign_layers(order: &[String], edges: &[Edge]) -> (Vec<GraphLayer>, Vec<String>) {
	let index: HashMap<&str, usize> = order
		.iter()
		.enumerate()
		.map(|(i, id)| (id.as_str(), i))
		.collect();
	let mut in_degree = vec![0usize; order.len()];
	let mut successors: Vec<Vec<usize>> = vec![Vec::new(); order.len()];

	for edge in edges {
		let (Some(&from), Some(&to)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
		else {
			continue;
		};
		in_degree[to] += 1;
		successors[from].push(to);
	}

	let mut placed = vec![false; order.len()];
	let mut frontier: Vec<usize> = (0..order.len()).filter(|&i| in_degree[i] == 0).collect();
	let mut layers = Vec::new();

	while !frontier.is_empty() {
		let mut next = Vec::new();
		for &node in &frontier {
			placed[node] = true;
			for &succ in &successors[node] {
				in_degree[succ] -= 1;
				if in_degree[succ] == 0 {
					next.push(succ);
				}
			}
		}
		layers.push(frontier.iter().map(|&i| order[i].clone()).collect());
		frontier = next;
	}

	let unplaced = order
		.iter()
		.zip(&placed)
		.filter(|(_, placed)| !**placed)
		.map(|(id, _)| id.clone())
		.collect();

	(layers, unplaced)
}

pub fn layered_layout(snapshot: &Snapshot, layer_step: f64, node_spacing: f64) -> LayeredLayout {
	let order = node_order(snapshot);
	let (layers, unplaced) = assign_layers(&order, &snapshot.edges);

	let mut positions = Vec::with_capacity(order.len());
	for (depth, layer) in layers.iter().enumerate() {
		let center = (layer.len() as f64 - 1.0) / 2.0;
		for (i, id) in layer.iter().enumerate() {
			positions.push((
				id.clone(),
				Point::new((i as f64 - center) * node_spacing, depth as f64 * layer_step),
			));
		}
	}

	LayeredLayout {
		layers,
		positions,
		unplaced,
	}
}
