use std::f64::consts::PI;

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::telemetry::color::Rgba;
use crate::telemetry::layout::Viewport;
use crate::telemetry::render::RenderSurface;
use crate::telemetry::types::Point;
use crate::telemetry::view::ViewTransform;

#[derive(Debug, Error)]
pub enum SurfaceError {
	#[error("no browser window")]
	NoWindow,
	#[error("canvas has no 2d context")]
	NoContext,
	#[error("frame callback not installed")]
	NoCallback,
	#[error("browser call failed: {0}")]
	Js(String),
}

impl From<JsValue> for SurfaceError {
	fn from(value: JsValue) -> Self {
		SurfaceError::Js(format!("{value:?}"))
	}
}

/// `RenderSurface` over a 2D canvas context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
		let ctx = canvas
			.get_context("2d")?
			.ok_or(SurfaceError::NoContext)?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| SurfaceError::NoContext)?;
		Ok(Self { canvas, ctx })
	}

	pub fn resize(&self, width: f64, height: f64) {
		self.canvas.set_width(width as u32);
		self.canvas.set_height(height as u32);
	}

	fn dash(&self, pattern: Option<(f64, f64)>) {
		let array = match pattern {
			Some((dash, gap)) => js_sys::Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(gap)),
			None => js_sys::Array::new(),
		};
		let _ = self.ctx.set_line_dash(&array);
	}
}

impl RenderSurface for CanvasSurface {
	fn is_available(&self) -> bool {
		self.canvas.is_connected()
	}

	fn clear(&mut self, viewport: Viewport, background: Rgba) {
		let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
		self.ctx.set_global_alpha(1.0);
		self.ctx.set_fill_style_str(&background.to_css());
		self.ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);
	}

	fn grid_line(&mut self, from: Point, to: Point, color: Rgba) {
		self.ctx.set_stroke_style_str(&color.to_css());
		self.ctx.set_line_width(1.0);
		self.ctx.begin_path();
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.stroke();
	}

	fn push_view(&mut self, view: &ViewTransform) {
		self.ctx.save();
		let _ = self.ctx.translate(view.x, view.y);
		let _ = self.ctx.scale(view.k, view.k);
	}

	fn pop_view(&mut self) {
		self.ctx.restore();
	}

	fn line(&mut self, from: Point, to: Point, width: f64, color: Rgba, dashed: bool) {
		self.ctx.set_stroke_style_str(&color.to_css());
		self.ctx.set_line_width(width);
		if dashed {
			self.dash(Some((width * 5.0, width * 3.0)));
		}
		self.ctx.begin_path();
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.stroke();
		if dashed {
			self.dash(None);
		}
	}

	fn arrow(&mut self, tip: Point, (ux, uy): (f64, f64), size: f64, color: Rgba) {
		let (back_x, back_y) = (tip.x - ux * size, tip.y - uy * size);
		let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.begin_path();
		self.ctx.move_to(tip.x, tip.y);
		self.ctx.line_to(back_x + px, back_y + py);
		self.ctx.line_to(back_x - px, back_y - py);
		self.ctx.close_path();
		self.ctx.fill();
	}

	fn circle(&mut self, center: Point, radius: f64, fill: Rgba) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
		self.ctx.set_fill_style_str(&fill.to_css());
		self.ctx.fill();
	}

	fn ring(&mut self, center: Point, radius: f64, width: f64, color: Rgba) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
		self.ctx.set_stroke_style_str(&color.to_css());
		self.ctx.set_line_width(width);
		self.ctx.stroke();
	}

	fn glow(&mut self, center: Point, inner: f64, outer: f64, color: Rgba) {
		let Ok(gradient) = self
			.ctx
			.create_radial_gradient(center.x, center.y, inner, center.x, center.y, outer)
		else {
			return;
		};
		let _ = gradient.add_color_stop(0.0, &color.to_css());
		let _ = gradient.add_color_stop(0.6, &color.with_alpha(color.a * 0.3).to_css());
		let _ = gradient.add_color_stop(1.0, &color.with_alpha(0.0).to_css());
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, outer, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill();
	}

	fn text(&mut self, text: &str, at: Point, size: f64, color: Rgba) {
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.set_font(&format!("{size}px sans-serif"));
		let _ = self.ctx.fill_text(text, at.x, at.y);
	}
}
