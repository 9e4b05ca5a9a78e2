use std::collections::HashMap;

use super::super::color::sanitize_score;
use super::super::config::EngineConfig;
use super::super::hash::{stable_hash, unit_pair};
use super::super::types::{EntityRole, Point, Snapshot};
use super::Viewport;

/// Entities sharing an aggregation key, drawn as one bubble.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
	pub key: String,
	pub role: EntityRole,
	pub count: usize,
	/// Mean member score.
	pub score: f64,
	pub position: Point,
}

/// Where an entity's label is drawn. Only for legibility; hit-testing uses
/// the cluster center.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityLabel {
	pub id: String,
	pub position: Point,
}

pub fn anchor(role: EntityRole, viewport: Viewport) -> Point {
	let x = match role {
		EntityRole::Source => viewport.width * 0.25,
		EntityRole::Destination => viewport.width * 0.75,
		EntityRole::Node => viewport.width * 0.5,
	};
	Point::new(x, viewport.height / 2.0)
}

/// Position of a cluster key around its role's anchor.
pub fn cluster_position(key: &str, role: EntityRole, viewport: Viewport, config: &EngineConfig) -> Point {
	let hash = stable_hash(key);
	let angle = f64::from(hash);
	let radius =
		config.cluster_base_radius + f64::from(hash.unsigned_abs() % config.cluster_radius_spread.max(1));
	let origin = anchor(role, viewport);
	Point::new(origin.x + angle.cos() * radius, origin.y + angle.sin() * radius)
}

/// Groups source and destination entities into clusters, in order of first
/// sighting. Entities with the `Node` role are not part of a flow diagram.
pub fn cluster_layout(
	snapshot: &Snapshot,
	viewport: Viewport,
	config: &EngineConfig,
) -> (Vec<Cluster>, Vec<EntityLabel>) {
	let mut clusters: Vec<Cluster> = Vec::new();
	let mut index: HashMap<(EntityRole, &str), usize> = HashMap::new();
	let mut labels = Vec::new();

	for entity in &snapshot.entities {
		if entity.role == EntityRole::Node {
			continue;
		}
		let key = entity.cluster_key();
		let slot = *index.entry((entity.role, key)).or_insert_with(|| {
			clusters.push(Cluster {
				key: key.to_string(),
				role: entity.role,
				count: 0,
				score: 0.0,
				position: cluster_position(key, entity.role, viewport, config),
			});
			clusters.len() - 1
		});

		let cluster = &mut clusters[slot];
		cluster.count += 1;
		// running mean
		cluster.score += (sanitize_score(entity.score) - cluster.score) / cluster.count as f64;

		let (jx, jy) = unit_pair(&entity.id);
		labels.push(EntityLabel {
			id: entity.id.clone(),
			position: Point::new(
				cluster.position.x + jx * config.label_jitter,
				cluster.position.y + jy * config.label_jitter,
			),
		});
	}

	(clusters, labels)
}
