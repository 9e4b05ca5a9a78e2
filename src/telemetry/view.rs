use super::types::Point;

/// Screen = world * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn world_to_screen(&self, p: Point) -> Point {
		Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Zooms by one wheel notch, keeping the world point under the cursor fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	/// Set once the pointer moved far enough that the release is not a click.
	pub moved: bool,
}

const CLICK_SLOP: f64 = 4.0;

impl PanState {
	pub fn begin(&mut self, sx: f64, sy: f64, view: &ViewTransform) {
		*self = Self {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: view.x,
			transform_start_y: view.y,
			moved: false,
		};
	}

	pub fn drag(&mut self, sx: f64, sy: f64, view: &mut ViewTransform) {
		if !self.active {
			return;
		}
		let (dx, dy) = (sx - self.start_x, sy - self.start_y);
		if dx.abs() > CLICK_SLOP || dy.abs() > CLICK_SLOP {
			self.moved = true;
		}
		view.x = self.transform_start_x + dx;
		view.y = self.transform_start_y + dy;
	}

	/// Ends the gesture; true when it should count as a click.
	pub fn end(&mut self) -> bool {
		let click = self.active && !self.moved;
		self.active = false;
		self.moved = false;
		click
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_world_round_trip() {
		let view = ViewTransform { x: 40.0, y: -10.0, k: 2.0 };
		let world = view.screen_to_world(140.0, 90.0);
		assert_eq!(world, Point::new(50.0, 50.0));
		assert_eq!(view.world_to_screen(world), Point::new(140.0, 90.0));
	}

	#[test]
	fn zoom_keeps_cursor_anchor() {
		let mut view = ViewTransform::default();
		let before = view.screen_to_world(300.0, 200.0);
		view.zoom_at(300.0, 200.0, -1.0);
		let after = view.screen_to_world(300.0, 200.0);
		assert!((before.x - after.x).abs() < 1e-9);
		assert!((before.y - after.y).abs() < 1e-9);
		assert!((view.k - 1.1).abs() < 1e-12);
	}

	#[test]
	fn short_drag_is_a_click() {
		let mut view = ViewTransform::default();
		let mut pan = PanState::default();
		pan.begin(10.0, 10.0, &view);
		pan.drag(12.0, 11.0, &mut view);
		assert!(pan.end());

		pan.begin(10.0, 10.0, &view);
		pan.drag(60.0, 10.0, &mut view);
		assert!(!pan.end());
		assert!(!pan.active);
	}
}
