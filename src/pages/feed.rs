//! Stand-in for the data-fetching layer: deterministic sample snapshots and
//! a timer-driven event stream.

use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;

use crate::telemetry::TelemetryEvent;

const RETAINED_EVENTS: usize = 50;

const MODULUS: u64 = 233280;

/// Simple pseudo-random number generator (deterministic for consistency).
/// Arithmetic is in u64 and the seed is reduced first, so it never overflows
/// on 32-bit targets.
pub fn rand_simple(seed: u64) -> f64 {
	let x = ((seed % MODULUS + 1) * 9301 + 49297) % MODULUS;
	(x as f64) / MODULUS as f64
}

/// Picks the `n`th synthetic event over the given routes.
pub fn synth_event(n: u64, routes: &[(String, String)]) -> Option<TelemetryEvent> {
	if routes.is_empty() {
		return None;
	}
	let pick = (rand_simple(n.wrapping_mul(7).wrapping_add(3)) * routes.len() as f64) as usize % routes.len();
	let (source, dest) = &routes[pick];
	// skew towards low risk, with the occasional spike
	let score = rand_simple(n.wrapping_mul(13).wrapping_add(1)).powi(3);
	Some(TelemetryEvent {
		id: format!("evt-{n}"),
		source_key: source.clone(),
		dest_key: dest.clone(),
		score,
		timestamp: n,
	})
}

/// Appends one synthetic event every `period_ms` until the owning view is
/// torn down.
pub fn use_event_feed(routes: Vec<(String, String)>, period_ms: i32) -> RwSignal<Vec<TelemetryEvent>> {
	let events = RwSignal::new(Vec::<TelemetryEvent>::new());
	let counter = Rc::new(Cell::new(0u64));

	let tick: Closure<dyn FnMut()> = Closure::new(move || {
		let n = counter.get();
		counter.set(n.wrapping_add(1));
		let Some(event) = synth_event(n, &routes) else {
			return;
		};
		events.update(|list| {
			list.push(event);
			if list.len() > RETAINED_EVENTS {
				let excess = list.len() - RETAINED_EVENTS;
				list.drain(..excess);
			}
		});
	});

	let Some(window) = web_sys::window() else {
		log::warn!("no window, event feed disabled");
		return events;
	};
	let started =
		window.set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), period_ms);
	match started {
		Ok(handle) => {
			let stop = SendWrapper::new(move || {
				window.clear_interval_with_handle(handle);
				drop(tick);
			});
			on_cleanup(move || (stop.take())());
		}
		Err(err) => log::warn!("event feed not started: {err:?}"),
	}

	events
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn synthetic_events_are_reproducible() {
		let routes = vec![("a".to_string(), "b".to_string()), ("c".to_string(), "d".to_string())];
		assert_eq!(synth_event(5, &routes), synth_event(5, &routes));
		let event = synth_event(9, &routes).unwrap();
		assert!((0.0..=1.0).contains(&event.score));
		assert_eq!(event.id, "evt-9");
	}

	#[test]
	fn long_running_feed_stays_in_range() {
		let routes = vec![("a".to_string(), "b".to_string())];
		for n in [35_500, 461_777, u64::from(u32::MAX), u64::MAX] {
			let event = synth_event(n, &routes).unwrap();
			assert!((0.0..=1.0).contains(&event.score));
			assert!((0.0..1.0).contains(&rand_simple(n)));
		}
	}

	#[test]
	fn no_routes_no_events() {
		assert_eq!(synth_event(0, &[]), None);
	}
}
