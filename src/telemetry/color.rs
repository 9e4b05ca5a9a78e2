//! Risk/trust score to color mapping.
//!
//! Three linear bands, continuous at the band edges:
//!
//! | score        | from            | to               |
//! |--------------|-----------------|------------------|
//! | `[0, 0.3)`   | bright green    | muted green      |
//! | `[0.3, 0.7)` | muted green     | amber            |
//! | `[0.7, 1.0]` | amber           | red, fully opaque|
//!
//! Red minus green and alpha never decrease as the score grows.

use serde::{Deserialize, Serialize};

const SAFE_END: f64 = 0.3;
const CAUTION_END: f64 = 0.7;

const SAFE: Rgba = Rgba::new(16, 220, 120, 0.75);
const CALM: Rgba = Rgba::new(16, 180, 120, 0.75);
const AMBER: Rgba = Rgba::new(245, 158, 11, 0.8);
const RED: Rgba = Rgba::new(255, 40, 40, 1.0);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Rgba {
	pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self {
			a: a.clamp(0.0, 1.0),
			..self
		}
	}

	/// Red minus green; larger reads as more alarming.
	pub fn alarm(&self) -> i32 {
		i32::from(self.r) - i32::from(self.g)
	}

	pub fn to_css(&self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}

	fn lerp(from: Rgba, to: Rgba, t: f64) -> Rgba {
		let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
		Rgba {
			r: channel(from.r, to.r),
			g: channel(from.g, to.g),
			b: channel(from.b, to.b),
			a: from.a + (to.a - from.a) * t,
		}
	}
}

/// Clamps a score into `[0, 1]`. NaN is treated as the safe end.
pub fn sanitize_score(score: f64) -> f64 {
	if score.is_nan() {
		0.0
	} else {
		score.clamp(0.0, 1.0)
	}
}

pub fn risk_color(score: f64) -> Rgba {
	let score = sanitize_score(score);
	if score < SAFE_END {
		Rgba::lerp(SAFE, CALM, score / SAFE_END)
	} else if score < CAUTION_END {
		Rgba::lerp(CALM, AMBER, (score - SAFE_END) / (CAUTION_END - SAFE_END))
	} else {
		Rgba::lerp(AMBER, RED, (score - CAUTION_END) / (1.0 - CAUTION_END))
	}
}

/// Trust is inverted risk: a fully trusted member is drawn safe.
pub fn trust_color(trust: f64) -> Rgba {
	risk_color(1.0 - sanitize_score(trust))
}

/// True when the score falls in the red band.
pub fn is_danger(score: f64) -> bool {
	sanitize_score(score) >= CAUTION_END
}
