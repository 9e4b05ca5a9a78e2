use serde::{Deserialize, Serialize};

/// A 2-D position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRole {
	Source,
	Destination,
	#[default]
	Node,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
	Healthy,
	Degraded,
	Compromised,
	Offline,
}

/// Something the dashboard draws: an endpoint, graph node, federation member
/// or simulated agent. Identity belongs to the data source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
	pub id: String,
	#[serde(default)]
	pub role: EntityRole,
	#[serde(default)]
	pub category: String,
	#[serde(default)]
	pub score: f64,
	#[serde(default)]
	pub status: Option<EntityStatus>,
	/// Aggregation key for cluster layouts. Falls back to `id`.
	#[serde(default)]
	pub group: Option<String>,
}

impl Entity {
	pub fn new(id: impl Into<String>, role: EntityRole, score: f64) -> Self {
		Self {
			id: id.into(),
			role,
			category: String::new(),
			score,
			status: None,
			group: None,
		}
	}

	pub fn with_status(mut self, status: EntityStatus) -> Self {
		self.status = Some(status);
		self
	}

	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.group = Some(group.into());
		self
	}

	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = category.into();
		self
	}

	pub fn cluster_key(&self) -> &str {
		self.group.as_deref().unwrap_or(&self.id)
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub label: Option<String>,
}

impl Edge {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			label: None,
		}
	}

	pub fn labelled(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
}

/// Immutable view of the external data, replaced wholesale on every update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
	#[serde(default)]
	pub entities: Vec<Entity>,
	#[serde(default)]
	pub edges: Vec<Edge>,
}

impl Snapshot {
	pub fn new(entities: Vec<Entity>, edges: Vec<Edge>) -> Self {
		Self { entities, edges }
	}

	pub fn entity(&self, id: &str) -> Option<&Entity> {
		self.entities.iter().find(|entity| entity.id == id)
	}
}

/// One observed event (e.g. a packet) that becomes a particle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
	pub id: String,
	pub source_key: String,
	pub dest_key: String,
	#[serde(default)]
	pub score: f64,
	#[serde(default)]
	pub timestamp: u64,
}

impl TelemetryEvent {
	pub fn new(
		id: impl Into<String>,
		source_key: impl Into<String>,
		dest_key: impl Into<String>,
		score: f64,
	) -> Self {
		Self {
			id: id.into(),
			source_key: source_key.into(),
			dest_key: dest_key.into(),
			score,
			timestamp: 0,
		}
	}
}
