use serde::{Deserialize, Serialize};

use super::config::HitRadii;
use super::types::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
	Particle,
	Node,
	Cluster,
}

/// What the pointer landed on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitTarget {
	pub kind: HitKind,
	pub id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HitCandidate {
	pub kind: HitKind,
	pub id: String,
	pub position: Point,
}

/// Positions as drawn in the most recent frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameGeometry {
	pub candidates: Vec<HitCandidate>,
}

impl FrameGeometry {
	pub fn push(&mut self, kind: HitKind, id: impl Into<String>, position: Point) {
		self.candidates.push(HitCandidate {
			kind,
			id: id.into(),
			position,
		});
	}

	pub fn len(&self) -> usize {
		self.candidates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}
}

impl HitRadii {
	pub fn for_kind(&self, kind: HitKind) -> f64 {
		match kind {
			HitKind::Particle => self.particle,
			HitKind::Node => self.node,
			HitKind::Cluster => self.cluster,
		}
	}
}

/// Closest candidate within its kind's radius. Linear scan: on-screen counts
/// stay in the hundreds. Ties go to the earlier candidate.
pub fn query_nearest(x: f64, y: f64, geometry: &FrameGeometry, radii: &HitRadii) -> Option<HitTarget> {
	let pointer = Point::new(x, y);
	let mut best: Option<(&HitCandidate, f64)> = None;

	for candidate in &geometry.candidates {
		let distance = candidate.position.distance(pointer);
		if distance.is_nan() || distance > radii.for_kind(candidate.kind) {
			continue;
		}
		if best.is_none_or(|(_, best_distance)| distance < best_distance) {
			best = Some((candidate, distance));
		}
	}

	best.map(|(candidate, _)| HitTarget {
		kind: candidate.kind,
		id: candidate.id.clone(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn radii(particle: f64) -> HitRadii {
		HitRadii {
			particle,
			..HitRadii::default()
		}
	}

	#[test]
	fn single_particle_scenario() {
		let mut geometry = FrameGeometry::default();
		geometry.push(HitKind::Particle, "pkt-7", Point::new(100.0, 100.0));
		let radii = radii(10.0);

		let hit = query_nearest(105.0, 103.0, &geometry, &radii).unwrap();
		assert_eq!(hit.id, "pkt-7");
		assert_eq!(hit.kind, HitKind::Particle);
		assert_eq!(query_nearest(200.0, 200.0, &geometry, &radii), None);
	}

	#[test]
	fn nearest_wins_and_ties_keep_first() {
		let mut geometry = FrameGeometry::default();
		geometry.push(HitKind::Node, "far", Point::new(10.0, 0.0));
		geometry.push(HitKind::Node, "left", Point::new(-5.0, 0.0));
		geometry.push(HitKind::Node, "right", Point::new(5.0, 0.0));
		let hit = query_nearest(0.0, 0.0, &geometry, &HitRadii::default()).unwrap();
		assert_eq!(hit.id, "left");
	}

	#[test]
	fn radius_depends_on_kind() {
		let mut geometry = FrameGeometry::default();
		geometry.push(HitKind::Particle, "p", Point::new(0.0, 0.0));
		geometry.push(HitKind::Cluster, "c", Point::new(20.0, 0.0));
		// 15 from the particle, 5 from the cluster center but cluster radius is 24
		let hit = query_nearest(15.0, 0.0, &geometry, &radii(10.0)).unwrap();
		assert_eq!(hit, HitTarget { kind: HitKind::Cluster, id: "c".into() });
		// inside the particle radius but closer to nothing else in range
		let hit = query_nearest(-8.0, 0.0, &geometry, &radii(10.0)).unwrap();
		assert_eq!(hit.id, "p");
	}

	#[test]
	fn nan_positions_never_hit() {
		let mut geometry = FrameGeometry::default();
		geometry.push(HitKind::Node, "nan", Point::new(f64::NAN, f64::NAN));
		geometry.push(HitKind::Node, "real", Point::new(0.0, 0.0));
		assert_eq!(query_nearest(5000.0, 5000.0, &geometry, &HitRadii::default()), None);
		let hit = query_nearest(3.0, 0.0, &geometry, &HitRadii::default()).unwrap();
		assert_eq!(hit.id, "real");
	}

	#[test]
	fn empty_geometry_misses() {
		assert_eq!(query_nearest(0.0, 0.0, &FrameGeometry::default(), &HitRadii::default()), None);
	}
}
