use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::canvas::SurfaceError;
use crate::telemetry::scheduler::{FrameHandle, FrameHost};

pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` host. The closure slot is shared with the
/// component, which installs the frame callback after the scheduler exists
/// and empties the slot on unmount.
pub struct RafHost {
	window: Window,
	callback: FrameCallback,
}

impl RafHost {
	pub fn new(window: Window) -> Self {
		Self {
			window,
			callback: Rc::new(RefCell::new(None)),
		}
	}

	pub fn slot(&self) -> FrameCallback {
		self.callback.clone()
	}
}

impl FrameHost for RafHost {
	type Error = SurfaceError;

	fn request_frame(&mut self) -> Result<FrameHandle, SurfaceError> {
		let callback = self.callback.borrow();
		let callback = callback.as_ref().ok_or(SurfaceError::NoCallback)?;
		let id = self
			.window
			.request_animation_frame(callback.as_ref().unchecked_ref())?;
		Ok(FrameHandle(id))
	}

	fn cancel_frame(&mut self, handle: FrameHandle) {
		let _ = self.window.cancel_animation_frame(handle.0);
	}
}
