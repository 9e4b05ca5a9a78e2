//! Stateless spatial layout.
//!
//! Layouts are recomputed from the current snapshot and viewport size; there
//! is no stored coordinate anywhere, so identical inputs must always produce
//! identical output.

mod cluster;
mod layered;
mod relaxed;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use cluster::{Cluster, EntityLabel, anchor, cluster_layout, cluster_position};
pub use layered::{GraphLayer, LayeredLayout, assign_layers, layered_layout, node_order};
pub use relaxed::relaxed_layout;

use super::color::sanitize_score;
use super::config::EngineConfig;
use super::types::{EntityRole, EntityStatus, Point, Snapshot};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
	/// Source/destination flow diagram.
	#[default]
	Clusters,
	/// Top-down DAG (attack chains, causal graphs).
	Layered,
	/// Force-relaxed topology.
	Relaxed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedNode {
	pub id: String,
	pub position: Point,
	pub score: f64,
	pub status: Option<EntityStatus>,
}

/// One layout pass worth of positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComputedLayout {
	pub clusters: Vec<Cluster>,
	pub labels: Vec<EntityLabel>,
	pub nodes: Vec<PlacedNode>,
	pub layers: Vec<GraphLayer>,
	pub unplaced: Vec<String>,
	cluster_index: HashMap<(EntityRole, String), usize>,
	node_index: HashMap<String, usize>,
}

impl ComputedLayout {
	/// Where a particle for `key` starts (`Source`) or ends (`Destination`).
	/// Graph layouts ignore the role and look the key up as a node id.
	pub fn endpoint(&self, role: EntityRole, key: &str) -> Option<Point> {
		if !self.clusters.is_empty() {
			return self
				.cluster_index
				.get(&(role, key.to_string()))
				.map(|&i| self.clusters[i].position);
		}
		self.node_index.get(key).map(|&i| self.nodes[i].position)
	}

	pub fn node(&self, id: &str) -> Option<&PlacedNode> {
		self.node_index.get(id).map(|&i| &self.nodes[i])
	}

	fn with_clusters(clusters: Vec<Cluster>, labels: Vec<EntityLabel>) -> Self {
		let cluster_index = clusters
			.iter()
			.enumerate()
			.map(|(i, c)| ((c.role, c.key.clone()), i))
			.collect();
		Self {
			clusters,
			labels,
			cluster_index,
			..Self::default()
		}
	}

	fn with_nodes(snapshot: &Snapshot, positions: Vec<(String, Point)>) -> Self {
		let nodes: Vec<PlacedNode> = positions
			.into_iter()
			.map(|(id, position)| {
				let entity = snapshot.entity(&id);
				PlacedNode {
					score: entity.map(|e| sanitize_score(e.score)).unwrap_or_default(),
					status: entity.and_then(|e| e.status),
					id,
					position,
				}
			})
			.collect();
		let node_index = nodes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();
		Self {
			nodes,
			node_index,
			..Self::default()
		}
	}
}

pub fn compute_layout(
	strategy: LayoutStrategy,
	snapshot: &Snapshot,
	viewport: Viewport,
	config: &EngineConfig,
) -> ComputedLayout {
	match strategy {
		LayoutStrategy::Clusters => {
			let (clusters, labels) = cluster_layout(snapshot, viewport, config);
			ComputedLayout::with_clusters(clusters, labels)
		}
		LayoutStrategy::Layered => {
			let layered = layered_layout(snapshot, config.layer_step, config.node_spacing);
			let (dx, dy) = (viewport.width / 2.0, config.layer_margin);
			let positions = layered
				.positions
				.into_iter()
				.map(|(id, p)| (id, Point::new(p.x + dx, p.y + dy)))
				.collect();
			ComputedLayout {
				layers: layered.layers,
				unplaced: layered.unplaced,
				..ComputedLayout::with_nodes(snapshot, positions)
			}
		}
		LayoutStrategy::Relaxed => {
			let positions = relaxed_layout(snapshot, viewport, config.relax_iterations);
			ComputedLayout::with_nodes(snapshot, positions)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::telemetry::types::{Edge, Entity};

	#[test]
	fn cluster_endpoints_respect_role() {
		let snapshot = Snapshot::new(
			vec![
				Entity::new("A", EntityRole::Source, 0.1),
				Entity::new("B", EntityRole::Destination, 0.1),
			],
			vec![],
		);
		let layout = compute_layout(
			LayoutStrategy::Clusters,
			&snapshot,
			Viewport::new(800.0, 600.0),
			&EngineConfig::default(),
		);
		assert!(layout.endpoint(EntityRole::Source, "A").is_some());
		assert!(layout.endpoint(EntityRole::Destination, "B").is_some());
		assert!(layout.endpoint(EntityRole::Destination, "A").is_none());
	}

	#[test]
	fn layered_layout_is_translated_into_view() {
		let config = EngineConfig::default();
		let snapshot = Snapshot::new(
			vec![Entity::new("root", EntityRole::Node, 0.8)],
			vec![Edge::new("root", "leaf")],
		);
		let layout = compute_layout(
			LayoutStrategy::Layered,
			&snapshot,
			Viewport::new(800.0, 600.0),
			&config,
		);
		let root = layout.node("root").unwrap();
		assert_eq!(root.position, Point::new(400.0, config.layer_margin));
		assert_eq!(root.score, 0.8);
		let leaf = layout.endpoint(EntityRole::Destination, "leaf").unwrap();
		assert_eq!(leaf.y, config.layer_margin + config.layer_step);
	}
}
