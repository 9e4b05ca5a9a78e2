use std::collections::HashMap;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::super::hash::unit_pair;
use super::super::types::{Point, Snapshot};
use super::Viewport;
use super::layered::node_order;

const STEP: f32 = 0.016;
/// Per-node offset around the hashed seat. Ids whose hashes collide would
/// otherwise start on the same point, where the repulsion force is zero.
const SEAT_NUDGE: f64 = 1.0;
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Force-relaxed placement for topologies that may contain cycles
/// (federation meshes, segmentation graphs). Every node starts at a
/// hash-derived seat around the center and the simulation runs a fixed
/// number of fixed-size steps, so identical input gives identical output.
pub fn relaxed_layout(snapshot: &Snapshot, viewport: Viewport, iterations: u32) -> Vec<(String, Point)> {
	let order = node_order(snapshot);
	if order.is_empty() {
		return Vec::new();
	}

	let mut graph: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});

	let (cx, cy) = (viewport.width / 2.0, viewport.height / 2.0);
	let spread = viewport.width.min(viewport.height) * 0.35;
	let mut id_to_idx = HashMap::new();
	for (i, id) in order.iter().enumerate() {
		let (jx, jy) = unit_pair(id);
		let turn = i as f64 * GOLDEN_ANGLE;
		let idx = graph.add_node(NodeData {
			x: (cx + jx * spread + turn.cos() * SEAT_NUDGE) as f32,
			y: (cy + jy * spread + turn.sin() * SEAT_NUDGE) as f32,
			mass: 10.0,
			is_anchor: false,
			user_data: i,
		});
		id_to_idx.insert(id.as_str(), idx);
	}

	for edge in &snapshot.edges {
		if let (Some(&src), Some(&tgt)) = (
			id_to_idx.get(edge.source.as_str()),
			id_to_idx.get(edge.target.as_str()),
		) {
			if src != tgt {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}
	}

	for _ in 0..iterations {
		graph.update(STEP);
	}

	let mut placed = vec![Point::default(); order.len()];
	graph.visit_nodes(|node| {
		placed[node.data.user_data] = Point::new(f64::from(node.x()), f64::from(node.y()));
	});

	order.into_iter().zip(placed).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::telemetry::types::{Edge, Entity, EntityRole};

	fn mesh() -> Snapshot {
		Snapshot::new(
			["hq", "eu-west", "us-east", "ap-south"]
				.into_iter()
				.map(|id| Entity::new(id, EntityRole::Node, 0.1))
				.collect(),
			vec![
				Edge::new("hq", "eu-west"),
				Edge::new("eu-west", "us-east"),
				Edge::new("us-east", "hq"),
				Edge::new("hq", "ap-south"),
			],
		)
	}

	#[test]
	fn places_every_node_even_with_cycles() {
		let placed = relaxed_layout(&mesh(), Viewport::new(800.0, 600.0), 60);
		let ids: Vec<&str> = placed.iter().map(|(id, _)| id.as_str()).collect();
		assert_eq!(ids, vec!["hq", "eu-west", "us-east", "ap-south"]);
		assert!(placed.iter().all(|(_, p)| p.x.is_finite() && p.y.is_finite()));
	}

	#[test]
	fn same_input_same_positions() {
		let viewport = Viewport::new(1024.0, 768.0);
		assert_eq!(relaxed_layout(&mesh(), viewport, 120), relaxed_layout(&mesh(), viewport, 120));
	}

	#[test]
	fn colliding_hashes_still_separate() {
		use crate::telemetry::hash::stable_hash;
		assert_eq!(stable_hash("Aa"), stable_hash("BB"));

		let snapshot = Snapshot::new(
			vec![Entity::new("Aa", EntityRole::Node, 0.1), Entity::new("BB", EntityRole::Node, 0.1)],
			vec![],
		);
		let placed = relaxed_layout(&snapshot, Viewport::new(800.0, 600.0), 240);
		assert!(placed[0].1.distance(placed[1].1) > 5.0);
	}

	#[test]
	fn empty_snapshot_is_empty() {
		assert!(relaxed_layout(&Snapshot::default(), Viewport::new(10.0, 10.0), 10).is_empty());
	}
}
