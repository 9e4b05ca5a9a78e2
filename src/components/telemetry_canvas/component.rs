use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::canvas::{CanvasSurface, SurfaceError};
use super::raf::RafHost;
use crate::telemetry::{
	AnimationScheduler, EngineConfig, FrameOutcome, HitTarget, Holds, LayoutStrategy, Snapshot,
	TelemetryEngine, TelemetryEvent, ViewTransform, view::PanState,
};

/// Everything mutated by the frame loop and the pointer handlers.
struct Driver {
	engine: TelemetryEngine,
	scheduler: AnimationScheduler<RafHost>,
	surface: CanvasSurface,
	view: ViewTransform,
	pan: PanState,
	hovered: Option<HitTarget>,
	holds: Holds,
}

impl Driver {
	fn hold(&mut self, update: impl FnOnce(&mut Holds)) {
		update(&mut self.holds);
		self.scheduler.sync(self.holds);
	}

	fn on_frame(&mut self) {
		let Some(ticket) = self.scheduler.begin_frame() else {
			return;
		};
		let outcome = self
			.engine
			.frame(ticket, &mut self.surface, &self.view, self.hovered.as_ref());
		if outcome == FrameOutcome::SurfaceUnavailable {
			log::warn!("canvas detached, stopping animation loop");
			self.scheduler.stop();
		}
	}
}

type SharedDriver = Rc<RefCell<Option<Driver>>>;

/// DOM listener owned by the canvas, removed on teardown.
struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut()>,
}

type Listeners = Rc<RefCell<Vec<Listener>>>;

fn listen(
	listeners: &Listeners,
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut()>,
) -> Result<(), SurfaceError> {
	target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
	listeners.borrow_mut().push(Listener { target, event, callback });
	Ok(())
}

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback| v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback);
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

fn surface_size(
	window: &Window,
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		return window_size(window);
	}
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas view over the shared telemetry engine.
///
/// The frame loop is created once per mount. Snapshot and event updates are
/// pushed into the running engine; they never restart the loop. The loop is
/// released while `paused` is true or the page is hidden, and resumes after.
#[component]
pub fn TelemetryCanvas(
	#[prop(into)] snapshot: Signal<Snapshot>,
	#[prop(into)] events: Signal<Vec<TelemetryEvent>>,
	#[prop(default = LayoutStrategy::Clusters)] strategy: LayoutStrategy,
	#[prop(optional)] config: EngineConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	/// Called with whatever was clicked; not called on a miss.
	#[prop(default = None)]
	on_select: Option<Callback<HitTarget>>,
	#[prop(default = None)] on_hover: Option<Callback<Option<HitTarget>>>,
	#[prop(optional, into)] paused: MaybeProp<bool>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let driver: SharedDriver = Rc::new(RefCell::new(None));
	let listeners: Listeners = Rc::new(RefCell::new(Vec::new()));
	let frame_slot: Rc<RefCell<Option<super::raf::FrameCallback>>> = Rc::new(RefCell::new(None));

	let (driver_init, listeners_init, slot_init) = (driver.clone(), listeners.clone(), frame_slot.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if driver_init.borrow().is_some() {
			return;
		}
		let config = config.clone();
		if let Err(err) = mount(
			canvas,
			&driver_init,
			&listeners_init,
			&slot_init,
			MountOptions {
				strategy,
				config,
				fullscreen,
				width,
				height,
				snapshot,
				events,
				paused: paused.get_untracked().unwrap_or(false),
			},
		) {
			log::error!("telemetry canvas failed to start: {err}");
		}
	});

	let driver_snapshot = driver.clone();
	Effect::new(move |_| {
		let next = snapshot.get();
		if let Some(d) = driver_snapshot.borrow_mut().as_mut() {
			d.engine.set_snapshot(next);
		}
	});

	let driver_events = driver.clone();
	Effect::new(move |_| {
		events.with(|events| {
			if let Some(d) = driver_events.borrow_mut().as_mut() {
				d.engine.ingest_events(events);
			}
		});
	});

	let driver_pause = driver.clone();
	Effect::new(move |_| {
		let paused = paused.get().unwrap_or(false);
		if let Some(d) = driver_pause.borrow_mut().as_mut() {
			d.hold(|holds| holds.paused = paused);
		}
	});

	let teardown = SendWrapper::new({
		let driver = driver.clone();
		move || {
			// dropping the scheduler cancels the pending frame
			let taken = driver.borrow_mut().take();
			drop(taken);
			if let Some(slot) = frame_slot.borrow_mut().take() {
				slot.borrow_mut().take();
			}
			for listener in listeners.borrow_mut().drain(..) {
				let _ = listener
					.target
					.remove_event_listener_with_callback(listener.event, listener.callback.as_ref().unchecked_ref());
			}
			log::debug!("telemetry canvas torn down");
		}
	});
	on_cleanup(move || (teardown.take())());

	let driver_md = driver.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(d) = driver_md.borrow_mut().as_mut() {
			let view = d.view;
			d.pan.begin(x, y, &view);
		}
	};

	let driver_mm = driver.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let changed = {
			let mut guard = driver_mm.borrow_mut();
			let Some(d) = guard.as_mut() else {
				return;
			};
			if d.pan.active {
				let Driver { pan, view, .. } = d;
				pan.drag(x, y, view);
				None
			} else {
				let hit = d.engine.hit_test(x, y, &d.view);
				(hit != d.hovered).then(|| {
					d.hovered = hit.clone();
					hit
				})
			}
		};
		if let (Some(hit), Some(cb)) = (changed, on_hover) {
			cb.run(hit);
		}
	};

	let driver_mu = driver.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let selected = {
			let mut guard = driver_mu.borrow_mut();
			let Some(d) = guard.as_mut() else {
				return;
			};
			if d.pan.end() {
				d.engine.hit_test(x, y, &d.view)
			} else {
				None
			}
		};
		if let (Some(hit), Some(cb)) = (selected, on_select) {
			cb.run(hit);
		}
	};

	let driver_ml = driver.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let cleared = {
			let mut guard = driver_ml.borrow_mut();
			let Some(d) = guard.as_mut() else {
				return;
			};
			d.pan.end();
			d.hovered.take().is_some()
		};
		if let (true, Some(cb)) = (cleared, on_hover) {
			cb.run(None);
		}
	};

	let driver_wh = driver.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(d) = driver_wh.borrow_mut().as_mut() {
			d.view.zoom_at(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="telemetry-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: crosshair;"
		/>
	}
}

struct MountOptions {
	strategy: LayoutStrategy,
	config: EngineConfig,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
	snapshot: Signal<Snapshot>,
	events: Signal<Vec<TelemetryEvent>>,
	paused: bool,
}

/// Builds the engine, installs the frame callback and starts the loop.
fn mount(
	canvas: HtmlCanvasElement,
	driver: &SharedDriver,
	listeners: &Listeners,
	frame_slot: &Rc<RefCell<Option<super::raf::FrameCallback>>>,
	options: MountOptions,
) -> Result<(), SurfaceError> {
	let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
	let document = window.document().ok_or(SurfaceError::NoWindow)?;
	let (w, h) = surface_size(&window, &canvas, options.fullscreen, options.width, options.height);
	let surface = CanvasSurface::new(canvas)?;
	surface.resize(w, h);

	let mut engine = TelemetryEngine::new(options.strategy, options.config, w, h);
	engine.set_snapshot(options.snapshot.get_untracked());
	options
		.events
		.with_untracked(|events| engine.ingest_events(events));

	let host = RafHost::new(window.clone());
	let slot = host.slot();
	*frame_slot.borrow_mut() = Some(slot.clone());
	*driver.borrow_mut() = Some(Driver {
		engine,
		scheduler: AnimationScheduler::new(host),
		surface,
		view: ViewTransform::default(),
		pan: PanState::default(),
		hovered: None,
		holds: Holds {
			paused: options.paused,
			hidden: document.hidden(),
		},
	});

	let driver_frame = driver.clone();
	*slot.borrow_mut() = Some(Closure::new(move || {
		if let Some(d) = driver_frame.borrow_mut().as_mut() {
			d.on_frame();
		}
	}));

	if options.fullscreen {
		let driver_resize = driver.clone();
		let cb: Closure<dyn FnMut()> = Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = window_size(&win);
			if let Some(d) = driver_resize.borrow_mut().as_mut() {
				d.surface.resize(nw, nh);
				d.engine.resize(nw, nh);
			}
		});
		listen(listeners, window.clone().into(), "resize", cb)?;
	}

	let driver_visibility = driver.clone();
	let visibility_doc = document.clone();
	let cb: Closure<dyn FnMut()> = Closure::new(move || {
		let hidden = visibility_doc.hidden();
		if let Some(d) = driver_visibility.borrow_mut().as_mut() {
			d.hold(|holds| holds.hidden = hidden);
		}
	});
	listen(listeners, document.into(), "visibilitychange", cb)?;

	if let Some(d) = driver.borrow_mut().as_mut() {
		let holds = d.holds;
		d.scheduler.sync(holds);
	}
	log::info!("telemetry canvas started ({w}x{h}, {:?})", options.strategy);
	Ok(())
}
