use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid engine config: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("{field} must be at least 1")]
	ZeroValue { field: &'static str },
}

/// Hit-test tolerance per rendered entity kind, in world units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitRadii {
	pub particle: f64,
	pub node: f64,
	pub cluster: f64,
}

impl Default for HitRadii {
	fn default() -> Self {
		Self {
			particle: 10.0,
			node: 14.0,
			cluster: 24.0,
		}
	}
}

/// Tunables shared by every visualization built on the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	/// Frames a particle takes to cross from source to destination.
	pub traversal_frames: u32,
	/// Final frames of a particle's life during which it fades out.
	pub fade_window: u32,
	/// Only the most recent events of each update may spawn particles.
	pub event_tail: usize,
	pub layer_step: f64,
	pub node_spacing: f64,
	pub layer_margin: f64,
	pub cluster_base_radius: f64,
	pub cluster_radius_spread: u32,
	pub label_jitter: f64,
	pub node_radius: f64,
	pub particle_radius: f64,
	pub particle_radius_gain: f64,
	pub relax_iterations: u32,
	pub grid_step: f64,
	pub hit_radii: HitRadii,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			traversal_frames: 30,
			fade_window: 10,
			event_tail: 10,
			layer_step: 90.0,
			node_spacing: 120.0,
			layer_margin: 60.0,
			cluster_base_radius: 30.0,
			cluster_radius_spread: 60,
			label_jitter: 14.0,
			node_radius: 8.0,
			particle_radius: 2.0,
			particle_radius_gain: 2.0,
			relax_iterations: 240,
			grid_step: 48.0,
			hit_radii: HitRadii::default(),
		}
	}
}

impl EngineConfig {
	/// Parses a JSON document; missing fields keep their defaults.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.traversal_frames == 0 {
			return Err(ConfigError::ZeroValue {
				field: "traversal_frames",
			});
		}
		if self.cluster_radius_spread == 0 {
			return Err(ConfigError::ZeroValue {
				field: "cluster_radius_spread",
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config = EngineConfig::from_json(r#"{ "traversal_frames": 45, "hit_radii": { "node": 20 } }"#)
			.unwrap();
		assert_eq!(config.traversal_frames, 45);
		assert_eq!(config.fade_window, 10);
		assert_eq!(config.hit_radii.node, 20.0);
		assert_eq!(config.hit_radii.particle, 10.0);
	}

	#[test]
	fn rejects_zero_traversal() {
		let err = EngineConfig::from_json(r#"{ "traversal_frames": 0 }"#).unwrap_err();
		assert!(matches!(err, ConfigError::ZeroValue { field: "traversal_frames" }));
	}

	#[test]
	fn rejects_malformed_json() {
		assert!(matches!(
			EngineConfig::from_json("{ nope").unwrap_err(),
			ConfigError::Parse(_)
		));
	}
}
