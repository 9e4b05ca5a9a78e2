//! Per-frame loop control, independent of the host's frame primitive.
//!
//! The scheduler is `Idle` or `Scheduled` with exactly one outstanding
//! request. While running it re-arms itself from inside the frame callback;
//! `stop` cancels the outstanding request and dropping the scheduler stops it.

/// Opaque id returned by the host when a frame is requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Monotonic frame number handed to the engine for each delivered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameTicket(pub u64);

/// A host capable of delivering one callback on the next frame.
pub trait FrameHost {
	type Error: std::fmt::Display;

	fn request_frame(&mut self) -> Result<FrameHandle, Self::Error>;
	fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
	Idle,
	Scheduled(FrameHandle),
}

/// Reasons the loop is held back. It runs only while none of them apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Holds {
	/// Explicit pause from the embedding UI.
	pub paused: bool,
	/// The page is not visible.
	pub hidden: bool,
}

impl Holds {
	pub fn any(self) -> bool {
		self.paused || self.hidden
	}
}

pub struct AnimationScheduler<H: FrameHost> {
	host: H,
	state: SchedulerState,
	frames: u64,
}

impl<H: FrameHost> AnimationScheduler<H> {
	pub fn new(host: H) -> Self {
		Self {
			host,
			state: SchedulerState::Idle,
			frames: 0,
		}
	}

	pub fn state(&self) -> SchedulerState {
		self.state
	}

	pub fn is_running(&self) -> bool {
		matches!(self.state, SchedulerState::Scheduled(_))
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	/// Arms the first frame. Does nothing when already scheduled.
	pub fn start(&mut self) {
		if self.is_running() {
			return;
		}
		self.arm();
	}

	/// Cancels the outstanding frame, if any.
	pub fn stop(&mut self) {
		if let SchedulerState::Scheduled(handle) = self.state {
			self.host.cancel_frame(handle);
			self.state = SchedulerState::Idle;
			log::debug!("animation loop stopped after {} frames", self.frames);
		}
	}

	/// Starts or stops to match `holds`. Both directions are idempotent.
	pub fn sync(&mut self, holds: Holds) {
		if holds.any() {
			self.stop();
		} else {
			self.start();
		}
	}

	/// Called by the host's frame callback. Consumes the pending request,
	/// re-arms the next one and returns the ticket for this frame. Returns
	/// `None` for a late callback that arrives after `stop`.
	pub fn begin_frame(&mut self) -> Option<FrameTicket> {
		if !self.is_running() {
			return None;
		}
		self.state = SchedulerState::Idle;
		self.frames += 1;
		let ticket = FrameTicket(self.frames);
		self.arm();
		Some(ticket)
	}

	fn arm(&mut self) {
		match self.host.request_frame() {
			Ok(handle) => self.state = SchedulerState::Scheduled(handle),
			Err(err) => {
				log::warn!("could not schedule animation frame: {err}");
				self.state = SchedulerState::Idle;
			}
		}
	}
}

impl<H: FrameHost> Drop for AnimationScheduler<H> {
	fn drop(&mut self) {
		self.stop();
	}
}

/// Frame host driven by hand, for tests and headless use.
#[derive(Debug, Default)]
pub struct ManualHost {
	next: i32,
	pub pending: Vec<FrameHandle>,
	pub cancelled: Vec<FrameHandle>,
	pub fail: bool,
}

impl FrameHost for ManualHost {
	type Error = &'static str;

	fn request_frame(&mut self) -> Result<FrameHandle, Self::Error> {
		if self.fail {
			return Err("host refused frame");
		}
		self.next += 1;
		let handle = FrameHandle(self.next);
		self.pending.push(handle);
		Ok(handle)
	}

	fn cancel_frame(&mut self, handle: FrameHandle) {
		self.pending.retain(|h| *h != handle);
		self.cancelled.push(handle);
	}
}

impl ManualHost {
	/// Delivers the oldest pending frame, as the browser would.
	pub fn fire(&mut self) -> Option<FrameHandle> {
		if self.pending.is_empty() {
			None
		} else {
			Some(self.pending.remove(0))
		}
	}
}

impl AnimationScheduler<ManualHost> {
	/// Fires the pending frame and runs `begin_frame`, if one was pending.
	pub fn pump(&mut self) -> Option<FrameTicket> {
		self.host.fire()?;
		self.begin_frame()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn start_twice_arms_once() {
		let mut scheduler = AnimationScheduler::new(ManualHost::default());
		scheduler.start();
		scheduler.start();
		assert_eq!(scheduler.host().pending.len(), 1);
		assert!(scheduler.is_running());
	}

	#[test]
	fn stop_when_idle_is_noop() {
		let mut scheduler = AnimationScheduler::new(ManualHost::default());
		scheduler.stop();
		assert_eq!(scheduler.state(), SchedulerState::Idle);
		assert!(scheduler.host().cancelled.is_empty());
	}

	#[test]
	fn rearms_every_frame_with_one_outstanding() {
		let mut scheduler = AnimationScheduler::new(ManualHost::default());
		scheduler.start();
		for expected in 1..=5 {
			assert_eq!(scheduler.pump(), Some(FrameTicket(expected)));
			assert_eq!(scheduler.host().pending.len(), 1);
		}
	}

	#[test]
	fn stop_cancels_and_silences() {
		let mut scheduler = AnimationScheduler::new(ManualHost::default());
		scheduler.start();
		scheduler.pump();
		scheduler.stop();
		assert!(scheduler.host().pending.is_empty());
		assert_eq!(scheduler.host().cancelled.len(), 1);
		// late callback from the host
		assert_eq!(scheduler.begin_frame(), None);
		assert_eq!(scheduler.pump(), None);
	}

	#[test]
	fn restart_continues_ticket_sequence() {
		let mut scheduler = AnimationScheduler::new(ManualHost::default());
		scheduler.start();
		scheduler.pump();
		scheduler.stop();
		scheduler.start();
		assert_eq!(scheduler.pump(), Some(FrameTicket(2)));
	}

	#[test]
	fn holds_pause_and_resume() {
		let mut scheduler = AnimationScheduler::new(ManualHost::default());
		scheduler.sync(Holds::default());
		assert_eq!(scheduler.pump(), Some(FrameTicket(1)));

		let mut holds = Holds {
			hidden: true,
			..Holds::default()
		};
		scheduler.sync(holds);
		assert!(!scheduler.is_running());
		assert_eq!(scheduler.pump(), None);

		// visible again but still paused
		holds.hidden = false;
		holds.paused = true;
		scheduler.sync(holds);
		assert!(scheduler.host().pending.is_empty());

		holds.paused = false;
		scheduler.sync(holds);
		scheduler.sync(holds);
		assert_eq!(scheduler.host().pending.len(), 1);
		assert_eq!(scheduler.pump(), Some(FrameTicket(2)));
	}

	#[test]
	fn host_failure_leaves_scheduler_idle() {
		let mut scheduler = AnimationScheduler::new(ManualHost {
			fail: true,
			..ManualHost::default()
		});
		scheduler.start();
		assert!(!scheduler.is_running());
	}
}
