//! The shared engine instance behind every telemetry canvas.
//!
//! External updates (`set_snapshot`, `ingest_events`, `resize`) only record
//! what changed. All derived state (layout, scene edges, particles, hit
//! geometry) is mutated inside `frame`, which the scheduler calls once per
//! delivered frame.

use std::collections::{HashMap, HashSet};

use super::color::{risk_color, sanitize_score};
use super::config::EngineConfig;
use super::hit_test::{FrameGeometry, HitKind, HitTarget, query_nearest};
use super::layout::{ComputedLayout, LayoutStrategy, Viewport, compute_layout};
use super::particles::{Particle, ParticleSystem};
use super::render::{FrameScene, FrameStats, RenderSurface, SceneEdge, render_frame};
use super::scheduler::FrameTicket;
use super::types::{EntityRole, Snapshot, TelemetryEvent};
use super::view::ViewTransform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
	Rendered,
	/// The ticket was already processed.
	Duplicate,
	/// The drawing surface is gone; the caller should stop its scheduler.
	SurfaceUnavailable,
}

/// A flow between two cluster keys seen in the latest event tail.
#[derive(Clone, Debug, PartialEq)]
struct Flow {
	source: String,
	dest: String,
	score: f64,
}

pub struct TelemetryEngine {
	config: EngineConfig,
	strategy: LayoutStrategy,
	viewport: Viewport,
	snapshot: Snapshot,
	layout: ComputedLayout,
	layout_dirty: bool,
	flows: Vec<Flow>,
	edges: Vec<SceneEdge>,
	edges_dirty: bool,
	pending: Vec<TelemetryEvent>,
	seen: HashSet<String>,
	particles: ParticleSystem,
	geometry: FrameGeometry,
	last_ticket: Option<FrameTicket>,
}

impl TelemetryEngine {
	pub fn new(strategy: LayoutStrategy, config: EngineConfig, width: f64, height: f64) -> Self {
		let particles = ParticleSystem::new(config.traversal_frames, config.fade_window)
			.with_radius(config.particle_radius, config.particle_radius_gain);
		Self {
			strategy,
			viewport: Viewport::new(width, height),
			snapshot: Snapshot::default(),
			layout: ComputedLayout::default(),
			layout_dirty: true,
			flows: Vec::new(),
			edges: Vec::new(),
			edges_dirty: true,
			pending: Vec::new(),
			seen: HashSet::new(),
			particles,
			geometry: FrameGeometry::default(),
			last_ticket: None,
			config,
		}
	}

	pub fn strategy(&self) -> LayoutStrategy {
		self.strategy
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn layout(&self) -> &ComputedLayout {
		&self.layout
	}

	pub fn particles(&self) -> &[Particle] {
		self.particles.as_slice()
	}

	pub fn geometry(&self) -> &FrameGeometry {
		&self.geometry
	}

	/// Replaces the snapshot wholesale. Layout is rebuilt on the next frame.
	pub fn set_snapshot(&mut self, snapshot: Snapshot) {
		if snapshot != self.snapshot {
			self.snapshot = snapshot;
			self.layout_dirty = true;
		}
	}

	/// Must be called whenever the drawing surface changes size.
	pub fn resize(&mut self, width: f64, height: f64) {
		let viewport = Viewport::new(width, height);
		if viewport != self.viewport {
			self.viewport = viewport;
			self.layout_dirty = true;
		}
	}

	/// Takes the latest event list. Only its last `event_tail` entries are
	/// considered; those not present in the previous tail spawn a particle
	/// on the next frame.
	pub fn ingest_events(&mut self, events: &[TelemetryEvent]) {
		let tail = &events[events.len().saturating_sub(self.config.event_tail)..];

		for event in tail {
			if !self.seen.contains(&event.id) {
				self.pending.push(event.clone());
			}
		}
		self.seen = tail.iter().map(|event| event.id.clone()).collect();
		// frames may be paused while updates keep arriving; keep only the newest
		let overflow = self.pending.len().saturating_sub(self.config.event_tail);
		if overflow > 0 {
			self.pending.drain(..overflow);
		}

		let mut flows: Vec<Flow> = Vec::new();
		let mut index: HashMap<(&str, &str), usize> = HashMap::new();
		for event in tail {
			let score = sanitize_score(event.score);
			match index.get(&(event.source_key.as_str(), event.dest_key.as_str())) {
				Some(&i) => flows[i].score = flows[i].score.max(score),
				None => {
					index.insert((event.source_key.as_str(), event.dest_key.as_str()), flows.len());
					flows.push(Flow {
						source: event.source_key.clone(),
						dest: event.dest_key.clone(),
						score,
					});
				}
			}
		}
		if flows != self.flows {
			self.flows = flows;
			self.edges_dirty = true;
		}
	}

	/// Advances one frame and draws it. A ticket that was already processed
	/// is ignored, and nothing is touched when the surface is gone.
	pub fn frame(
		&mut self,
		ticket: FrameTicket,
		surface: &mut impl RenderSurface,
		view: &ViewTransform,
		hovered: Option<&HitTarget>,
	) -> FrameOutcome {
		if !surface.is_available() {
			return FrameOutcome::SurfaceUnavailable;
		}
		if !self.tick(ticket) {
			return FrameOutcome::Duplicate;
		}
		self.draw(surface, view, hovered);
		FrameOutcome::Rendered
	}

	/// Layout refresh, particle advance and pending spawns. Returns false for
	/// an already processed ticket.
	pub fn tick(&mut self, ticket: FrameTicket) -> bool {
		if self.last_ticket.is_some_and(|last| ticket <= last) {
			return false;
		}
		self.last_ticket = Some(ticket);

		if self.layout_dirty {
			self.layout = compute_layout(self.strategy, &self.snapshot, self.viewport, &self.config);
			self.layout_dirty = false;
			self.edges_dirty = true;
			log::debug!(
				"layout recomputed: {} clusters, {} nodes, {} unplaced",
				self.layout.clusters.len(),
				self.layout.nodes.len(),
				self.layout.unplaced.len()
			);
		}
		if self.edges_dirty {
			self.edges = self.scene_edges();
			self.edges_dirty = false;
		}

		self.particles.tick();
		for event in std::mem::take(&mut self.pending) {
			let from = self.layout.endpoint(EntityRole::Source, &event.source_key);
			let to = self.layout.endpoint(EntityRole::Destination, &event.dest_key);
			match (from, to) {
				(Some(from), Some(to)) => self.particles.spawn(event.id, from, to, event.score),
				_ => log::trace!(
					"dropping event {}: {} -> {} not in layout",
					event.id,
					event.source_key,
					event.dest_key
				),
			}
		}
		true
	}

	/// Draws the current state and records its geometry for hit-testing.
	pub fn draw(&mut self, surface: &mut impl RenderSurface, view: &ViewTransform, hovered: Option<&HitTarget>) {
		self.geometry = self.build_geometry();
		let scene = FrameScene {
			strategy: self.strategy,
			viewport: self.viewport,
			view: *view,
			layout: &self.layout,
			edges: &self.edges,
			particles: self.particles.as_slice(),
			hovered,
			grid_step: self.config.grid_step,
			node_radius: self.config.node_radius,
			stats: FrameStats {
				entities: self.snapshot.entities.len(),
				particles: self.particles.len(),
				unplaced: self.layout.unplaced.len(),
				frame: self.last_ticket.map_or(0, |t| t.0),
			},
		};
		render_frame(&scene, surface);
	}

	/// Resolves a screen-space pointer against the last drawn frame.
	pub fn hit_test(&self, sx: f64, sy: f64, view: &ViewTransform) -> Option<HitTarget> {
		let world = view.screen_to_world(sx, sy);
		query_nearest(world.x, world.y, &self.geometry, &self.config.hit_radii)
	}

	/// Drops every particle and pending spawn. Snapshot and layout are kept.
	pub fn reset(&mut self) {
		self.particles.clear();
		self.pending.clear();
		self.seen.clear();
		self.geometry = FrameGeometry::default();
	}

	fn scene_edges(&self) -> Vec<SceneEdge> {
		if self.strategy == LayoutStrategy::Clusters {
			return self
				.flows
				.iter()
				.filter_map(|flow| {
					Some(SceneEdge {
						from: self.layout.endpoint(EntityRole::Source, &flow.source)?,
						to: self.layout.endpoint(EntityRole::Destination, &flow.dest)?,
						label: None,
						color: risk_color(flow.score).with_alpha(0.35),
						directed: false,
					})
				})
				.collect();
		}

		self.snapshot
			.edges
			.iter()
			.filter_map(|edge| {
				let from = self.layout.node(&edge.source)?;
				let to = self.layout.node(&edge.target)?;
				Some(SceneEdge {
					from: from.position,
					to: to.position,
					label: edge.label.clone(),
					color: risk_color(to.score).with_alpha(0.6),
					directed: true,
				})
			})
			.collect()
	}

	fn build_geometry(&self) -> FrameGeometry {
		let mut geometry = FrameGeometry::default();
		// topmost first so exact ties resolve to what is drawn on top
		for particle in self.particles.iter() {
			geometry.push(HitKind::Particle, particle.id.as_str(), particle.position());
		}
		for node in &self.layout.nodes {
			geometry.push(HitKind::Node, node.id.as_str(), node.position);
		}
		for cluster in &self.layout.clusters {
			geometry.push(HitKind::Cluster, cluster.key.as_str(), cluster.position);
		}
		geometry
	}
}
