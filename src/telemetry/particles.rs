//! Short-lived markers for observed events.

use super::color::{Rgba, risk_color, sanitize_score};
use super::types::Point;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Borrowed from the event; not unique across particles.
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
	pub color: Rgba,
	pub score: f64,
	peak_alpha: f64,
	pub lifespan: u32,
	pub max_lifespan: u32,
}

impl Particle {
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

/// Owns every live particle. Nothing else holds references into it.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
	particles: Vec<Particle>,
	traversal_frames: u32,
	fade_window: u32,
	base_radius: f64,
	radius_gain: f64,
}

impl ParticleSystem {
	pub fn new(traversal_frames: u32, fade_window: u32) -> Self {
		Self {
			particles: Vec::new(),
			traversal_frames: traversal_frames.max(1),
			fade_window: fade_window.min(traversal_frames.max(1)),
			base_radius: 2.0,
			radius_gain: 2.0,
		}
	}

	pub fn with_radius(mut self, base: f64, gain: f64) -> Self {
		self.base_radius = base;
		self.radius_gain = gain;
		self
	}

	/// Adds a particle that covers `from -> to` in exactly `traversal_frames`
	/// ticks and then expires.
	pub fn spawn(&mut self, id: impl Into<String>, from: Point, to: Point, score: f64) {
		let score = sanitize_score(score);
		let frames = f64::from(self.traversal_frames);
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		let (vx, vy) = if dist > f64::EPSILON {
			// unit direction scaled to dist / frames per tick
			let (ux, uy) = (dx / dist, dy / dist);
			(ux * dist / frames, uy * dist / frames)
		} else {
			(0.0, 0.0)
		};
		let color = risk_color(score);

		self.particles.push(Particle {
			id: id.into(),
			x: from.x,
			y: from.y,
			vx,
			vy,
			radius: self.base_radius + score * self.radius_gain,
			color,
			score,
			peak_alpha: color.a,
			lifespan: self.traversal_frames,
			max_lifespan: self.traversal_frames,
		});
	}

	/// Advances every particle one frame and culls the expired ones.
	pub fn tick(&mut self) {
		let fade_window = self.fade_window;
		for particle in &mut self.particles {
			particle.x += particle.vx;
			particle.y += particle.vy;
			particle.lifespan = particle.lifespan.saturating_sub(1);
			if fade_window > 0 && particle.lifespan < fade_window {
				let remaining = f64::from(particle.lifespan) / f64::from(fade_window);
				particle.color = particle.color.with_alpha(particle.peak_alpha * remaining);
			}
		}
		self.particles.retain(|particle| particle.lifespan > 0);
	}

	pub fn clear(&mut self) {
		self.particles.clear();
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Particle> {
		self.particles.iter()
	}

	pub fn as_slice(&self) -> &[Particle] {
		&self.particles
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::telemetry::color::is_danger;

	fn system() -> ParticleSystem {
		ParticleSystem::new(30, 10)
	}

	#[test]
	fn arrives_exactly_at_destination() {
		let mut particles = system();
		particles.spawn("evt-1", Point::new(0.0, 0.0), Point::new(300.0, 150.0), 0.5);
		for _ in 0..29 {
			particles.tick();
		}
		let p = &particles.as_slice()[0];
		assert!((p.x - 290.0).abs() < 1e-9);
		assert!((p.y - 145.0).abs() < 1e-9);
		assert_eq!(p.lifespan, 1);
	}

	#[test]
	fn expires_after_max_lifespan() {
		let mut particles = system();
		particles.spawn("a", Point::new(0.0, 0.0), Point::new(10.0, 0.0), 0.1);
		particles.spawn("b", Point::new(5.0, 5.0), Point::new(5.0, 5.0), 0.9);
		let max = particles.as_slice()[0].max_lifespan;
		for _ in 0..max - 1 {
			particles.tick();
		}
		assert_eq!(particles.len(), 2);
		particles.tick();
		assert!(particles.is_empty());
	}

	#[test]
	fn fades_only_in_final_window() {
		let mut particles = system();
		particles.spawn("a", Point::new(0.0, 0.0), Point::new(100.0, 0.0), 1.0);
		let peak = particles.as_slice()[0].color.a;
		for _ in 0..20 {
			particles.tick();
		}
		// lifespan 10: not yet fading
		assert_eq!(particles.as_slice()[0].color.a, peak);
		particles.tick();
		let faded = particles.as_slice()[0].color.a;
		assert!((faded - peak * 0.9).abs() < 1e-9);
		let mut previous = faded;
		for _ in 0..8 {
			particles.tick();
			let a = particles.as_slice()[0].color.a;
			assert!(a < previous);
			previous = a;
		}
	}

	#[test]
	fn lifespan_invariant_holds() {
		let mut particles = system();
		for i in 0..5 {
			particles.spawn(format!("e{i}"), Point::new(0.0, 0.0), Point::new(50.0, 50.0), 0.4);
			particles.tick();
			for p in particles.iter() {
				assert!(p.lifespan <= p.max_lifespan);
			}
		}
	}

	#[test]
	fn color_and_radius_follow_score() {
		let mut particles = system().with_radius(2.0, 4.0);
		particles.spawn("hot", Point::new(0.0, 0.0), Point::new(1.0, 0.0), 0.9);
		particles.spawn("bad", Point::new(0.0, 0.0), Point::new(1.0, 0.0), f64::NAN);
		let hot = &particles.as_slice()[0];
		assert!(is_danger(hot.score));
		assert_eq!(hot.color, risk_color(0.9));
		assert!((hot.radius - 5.6).abs() < 1e-9);
		assert_eq!(particles.as_slice()[1].radius, 2.0);
	}
}
