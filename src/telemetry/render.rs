//! Draw-call sequencing for one frame.
//!
//! `render_frame` holds no state between frames: it clears the surface and
//! redraws everything in a fixed back-to-front order (background, grid,
//! edges, clusters, nodes, particles, overlay) so later layers occlude
//! earlier ones.

use super::color::{Rgba, risk_color};
use super::hit_test::{HitKind, HitTarget};
use super::layout::{ComputedLayout, LayoutStrategy, Viewport};
use super::particles::Particle;
use super::types::{EntityStatus, Point};
use super::view::ViewTransform;

pub const BACKGROUND: Rgba = Rgba::new(26, 26, 46, 1.0);
const GRID: Rgba = Rgba::new(60, 70, 80, 0.27);
const LABEL: Rgba = Rgba::new(255, 255, 255, 0.8);
const NODE_FILL: Rgba = Rgba::new(22, 27, 40, 1.0);
const HIGHLIGHT: Rgba = Rgba::new(255, 255, 255, 0.35);

/// Drawing backend. World-space calls happen between `push_view` and
/// `pop_view`; `clear`, `grid_line` and overlay `text` are in screen space.
pub trait RenderSurface {
	/// False once the backing surface is gone; the frame is then skipped.
	fn is_available(&self) -> bool;
	fn clear(&mut self, viewport: Viewport, background: Rgba);
	fn grid_line(&mut self, from: Point, to: Point, color: Rgba);
	fn push_view(&mut self, view: &ViewTransform);
	fn pop_view(&mut self);
	fn line(&mut self, from: Point, to: Point, width: f64, color: Rgba, dashed: bool);
	fn arrow(&mut self, tip: Point, direction: (f64, f64), size: f64, color: Rgba);
	fn circle(&mut self, center: Point, radius: f64, fill: Rgba);
	fn ring(&mut self, center: Point, radius: f64, width: f64, color: Rgba);
	fn glow(&mut self, center: Point, inner: f64, outer: f64, color: Rgba);
	fn text(&mut self, text: &str, at: Point, size: f64, color: Rgba);
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneEdge {
	pub from: Point,
	pub to: Point,
	pub label: Option<String>,
	pub color: Rgba,
	pub directed: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
	pub entities: usize,
	pub particles: usize,
	pub unplaced: usize,
	pub frame: u64,
}

/// Everything one frame needs, borrowed from the engine.
pub struct FrameScene<'a> {
	pub strategy: LayoutStrategy,
	pub viewport: Viewport,
	pub view: ViewTransform,
	pub layout: &'a ComputedLayout,
	pub edges: &'a [SceneEdge],
	pub particles: &'a [Particle],
	pub hovered: Option<&'a HitTarget>,
	pub grid_step: f64,
	pub node_radius: f64,
	pub stats: FrameStats,
}

impl FrameScene<'_> {
	fn is_hovered(&self, kind: HitKind, id: &str) -> bool {
		self.hovered.is_some_and(|h| h.kind == kind && h.id == id)
	}
}

pub fn render_frame(scene: &FrameScene<'_>, surface: &mut impl RenderSurface) {
	surface.clear(scene.viewport, BACKGROUND);
	draw_grid(scene, surface);

	surface.push_view(&scene.view);
	draw_edges(scene, surface);
	draw_clusters(scene, surface);
	draw_nodes(scene, surface);
	draw_particles(scene, surface);
	surface.pop_view();

	draw_overlay(scene, surface);
}

fn draw_grid(scene: &FrameScene<'_>, surface: &mut impl RenderSurface) {
	let step = (scene.grid_step * scene.view.k.clamp(0.6, 1.8)).max(20.0);
	let Viewport { width, height } = scene.viewport;

	let mut x = scene.view.x.rem_euclid(step);
	while x < width {
		surface.grid_line(Point::new(x, 0.0), Point::new(x, height), GRID);
		x += step;
	}
	let mut y = scene.view.y.rem_euclid(step);
	while y < height {
		surface.grid_line(Point::new(0.0, y), Point::new(width, y), GRID);
		y += step;
	}
}

fn draw_edges(scene: &FrameScene<'_>, surface: &mut impl RenderSurface) {
	let k = scene.view.k;
	let (line_width, arrow_size) = (1.5 / k, 8.0 / k);
	let inset = if scene.strategy == LayoutStrategy::Clusters {
		0.0
	} else {
		scene.node_radius
	};

	for edge in scene.edges {
		let (dx, dy) = (edge.to.x - edge.from.x, edge.to.y - edge.from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let head = if edge.directed { arrow_size } else { 0.0 };
		let start = Point::new(edge.from.x + ux * inset, edge.from.y + uy * inset);
		let end = Point::new(edge.to.x - ux * (inset + head), edge.to.y - uy * (inset + head));
		surface.line(start, end, line_width, edge.color, !edge.directed);

		if edge.directed {
			let tip = Point::new(edge.to.x - ux * inset, edge.to.y - uy * inset);
			surface.arrow(tip, (ux, uy), arrow_size, edge.color);
		}
		if let Some(label) = &edge.label {
			let mid = Point::new((edge.from.x + edge.to.x) / 2.0, (edge.from.y + edge.to.y) / 2.0);
			surface.text(label, mid, 9.0 / k.max(0.5), edge.color.with_alpha(0.9));
		}
	}
}

fn draw_clusters(scene: &FrameScene<'_>, surface: &mut impl RenderSurface) {
	let k = scene.view.k;
	for cluster in &scene.layout.clusters {
		let radius = 6.0 + (cluster.count as f64).sqrt() * 4.0;
		let color = risk_color(cluster.score);
		if scene.is_hovered(HitKind::Cluster, &cluster.key) {
			surface.glow(cluster.position, radius * 0.3, radius * 2.6, HIGHLIGHT);
		}
		surface.glow(cluster.position, radius * 0.5, radius * 1.8, color.with_alpha(0.25));
		surface.circle(cluster.position, radius, color);
		surface.text(
			&format!("{} ({})", cluster.key, cluster.count),
			Point::new(cluster.position.x + radius + 3.0, cluster.position.y + 3.0),
			11.0 / k.max(0.5),
			LABEL,
		);
	}
	for label in &scene.layout.labels {
		surface.text(&label.id, label.position, 8.0 / k.max(0.5), LABEL.with_alpha(0.45));
	}
}

fn draw_nodes(scene: &FrameScene<'_>, surface: &mut impl RenderSurface) {
	let (k, radius) = (scene.view.k, scene.node_radius);
	for node in &scene.layout.nodes {
		let border = risk_color(node.score);
		let offline = node.status == Some(EntityStatus::Offline);
		let hovered = scene.is_hovered(HitKind::Node, &node.id);

		if hovered {
			surface.glow(node.position, radius * 0.3, radius * 3.0, HIGHLIGHT);
		}
		let fill = if offline { NODE_FILL.with_alpha(0.4) } else { NODE_FILL };
		surface.circle(node.position, radius, fill);
		surface.ring(node.position, radius, 2.0 / k, border);

		match node.status {
			Some(EntityStatus::Compromised) => {
				surface.ring(node.position, radius + 4.0 / k, 1.5 / k, risk_color(1.0));
			}
			Some(EntityStatus::Degraded) => {
				surface.ring(node.position, radius + 4.0 / k, 1.0 / k, risk_color(0.5));
			}
			_ => {}
		}
		if hovered {
			surface.ring(node.position, radius + 2.0 / k, 1.5 / k, LABEL.with_alpha(0.7));
		}

		let alpha = if offline { 0.4 } else { 0.8 };
		surface.text(
			&node.id,
			Point::new(node.position.x + radius + 3.0, node.position.y + 3.0),
			10.0 / k.max(0.5),
			LABEL.with_alpha(alpha),
		);
	}
}

fn draw_particles(scene: &FrameScene<'_>, surface: &mut impl RenderSurface) {
	for particle in scene.particles {
		if scene.is_hovered(HitKind::Particle, &particle.id) {
			surface.glow(particle.position(), particle.radius, particle.radius * 4.0, HIGHLIGHT);
		}
		surface.circle(particle.position(), particle.radius, particle.color);
	}
}

fn draw_overlay(scene: &FrameScene<'_>, surface: &mut impl RenderSurface) {
	let stats = scene.stats;
	let mut line = format!("entities {}  particles {}", stats.entities, stats.particles);
	if stats.unplaced > 0 {
		line.push_str(&format!("  unplaced {} (cycle)", stats.unplaced));
	}
	surface.text(&line, Point::new(12.0, scene.viewport.height - 14.0), 11.0, LABEL);
	if let Some(hovered) = scene.hovered {
		surface.text(&hovered.id, Point::new(12.0, scene.viewport.height - 30.0), 12.0, LABEL);
	}
}


#[cfg(test)]
mod tests {
	use super::recording::{Op, RecordingSurface};
	use super::*;
	use crate::telemetry::config::EngineConfig;
	use crate::telemetry::layout::compute_layout;
	use crate::telemetry::particles::ParticleSystem;
	use crate::telemetry::types::{Edge, Entity, EntityRole, Snapshot};

	#[test]
	fn draws_back_to_front() {
		let snapshot = Snapshot::new(
			vec![
				Entity::new("a", EntityRole::Node, 0.1),
				Entity::new("b", EntityRole::Node, 0.9),
			],
			vec![Edge::new("a", "b").labelled("exploit")],
		);
		let viewport = Viewport::new(400.0, 300.0);
		let layout = compute_layout(LayoutStrategy::Layered, &snapshot, viewport, &EngineConfig::default());
		let (a, b) = (layout.node("a").unwrap().position, layout.node("b").unwrap().position);
		let edges = [SceneEdge {
			from: a,
			to: b,
			label: Some("exploit".into()),
			color: risk_color(0.5),
			directed: true,
		}];
		let mut particles = ParticleSystem::new(30, 10);
		particles.spawn("evt", a, b, 0.95);

		let scene = FrameScene {
			strategy: LayoutStrategy::Layered,
			viewport,
			view: ViewTransform::default(),
			layout: &layout,
			edges: &edges,
			particles: particles.as_slice(),
			hovered: None,
			grid_step: 48.0,
			node_radius: 8.0,
			stats: FrameStats::default(),
		};
		let mut surface = RecordingSurface::default();
		render_frame(&scene, &mut surface);

		let ops = &surface;
		assert_eq!(ops.ops[0], Op::Clear);
		let last_grid = ops.last(|op| *op == Op::Grid).unwrap();
		let push = ops.first(|op| *op == Op::PushView).unwrap();
		let edge = ops.first(|op| *op == Op::Line).unwrap();
		let arrow = ops.first(|op| *op == Op::Arrow).unwrap();
		let first_node = ops.first(|op| *op == Op::Circle(NODE_FILL)).unwrap();
		let particle = ops.first(|op| *op == Op::Circle(risk_color(0.95))).unwrap();
		let pop = ops.first(|op| *op == Op::PopView).unwrap();
		let overlay = ops.last(|op| matches!(op, Op::Text(t) if t.starts_with("entities"))).unwrap();

		assert!(last_grid < push);
		assert!(push < edge && edge < arrow);
		assert!(arrow < first_node);
		assert!(first_node < particle);
		assert!(particle < pop);
		assert!(pop < overlay);
	}

	#[test]
	fn overlay_reports_unplaced_nodes() {
		let layout = ComputedLayout::default();
		let scene = FrameScene {
			strategy: LayoutStrategy::Layered,
			viewport: Viewport::new(100.0, 100.0),
			view: ViewTransform::default(),
			layout: &layout,
			edges: &[],
			particles: &[],
			hovered: None,
			grid_step: 48.0,
			node_radius: 8.0,
			stats: FrameStats {
				entities: 3,
				particles: 0,
				unplaced: 2,
				frame: 1,
			},
		};
		let mut surface = RecordingSurface::default();
		render_frame(&scene, &mut surface);
		assert!(surface.ops.contains(&Op::Text("entities 3  particles 0  unplaced 2 (cycle)".into())));
	}
}
