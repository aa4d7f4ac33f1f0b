//! Event countdown.
//!
//! Shows the time left until the event as `Xd Xh Xm Xs`, refreshed every
//! second while the page is visible. Once the start time has passed it shows
//! how long ago the event ended and stops refreshing.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;

use crate::dom;

/// 25 Jan 2025 09:00:00 GMT, used when the page gives no usable target.
pub const DEFAULT_TARGET_MS: f64 = 1_737_795_600_000.0;

const TICK_MS: i32 = 1000;

/// Whole days, hours, minutes and seconds of a non-negative duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Remaining {
	pub days: u64,
	pub hours: u64,
	pub minutes: u64,
	pub seconds: u64,
}

impl Remaining {
	/// Split `ms` (clamped at zero) into calendar units, rounding down.
	pub fn from_ms(ms: f64) -> Self {
		let total = if ms.is_finite() {
			(ms.max(0.0) / 1000.0).floor() as u64
		} else {
			0
		};
		Self {
			days: total / 86_400,
			hours: total % 86_400 / 3_600,
			minutes: total % 3_600 / 60,
			seconds: total % 60,
		}
	}
}

impl std::fmt::Display for Remaining {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}d {}h {}m {}s",
			self.days, self.hours, self.minutes, self.seconds
		)
	}
}

/// State of the countdown at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownState {
	/// Time left until the target.
	Pending(Remaining),
	/// Time since the target.
	Ended(Remaining),
}

impl CountdownState {
	pub fn at(target_ms: f64, now_ms: f64) -> Self {
		let diff = target_ms - now_ms;
		if diff > 0.0 {
			CountdownState::Pending(Remaining::from_ms(diff))
		} else {
			CountdownState::Ended(Remaining::from_ms(-diff))
		}
	}

	pub fn is_ended(&self) -> bool {
		matches!(self, CountdownState::Ended(_))
	}

	pub fn text(&self) -> String {
		match self {
			CountdownState::Pending(left) => left.to_string(),
			CountdownState::Ended(ago) => format!("Event has ended {} ago", ago),
		}
	}
}

/// Pick the countdown target from a parsed attribute value, falling back to
/// [`DEFAULT_TARGET_MS`] when it is missing or unparseable (`NaN`).
pub fn resolve_target(parsed_ms: Option<f64>) -> f64 {
	parsed_ms
		.filter(|ms| ms.is_finite())
		.unwrap_or(DEFAULT_TARGET_MS)
}

/// Parse a date string with the browser's date parser.
fn parse_target(raw: Option<&str>) -> f64 {
	resolve_target(raw.map(|s| js_sys::Date::parse(s.trim())))
}

/// Live countdown text.
///
/// `target` is any date string the browser can parse (e.g.
/// `2026-01-25T09:00:00Z`).
#[component]
pub fn Countdown(#[prop(default = None)] target: Option<String>) -> impl IntoView {
	let target_ms = parse_target(target.as_deref());
	let (text, set_text) = signal(CountdownState::at(target_ms, js_sys::Date::now()).text());

	let ended = Rc::new(Cell::new(false));
	let interval: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let visibility: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let stop = {
		let interval = interval.clone();
		move || {
			if let Some(handle) = interval.take() {
				if let Ok(w) = dom::window() {
					w.clear_interval_with_handle(handle);
				}
			}
		}
	};

	let start = {
		let (interval, tick) = (interval.clone(), tick.clone());
		move || {
			if interval.get().is_some() {
				return;
			}
			let callback = tick.borrow().as_ref().map(|c| c.as_ref().clone());
			let (Ok(w), Some(cb)) = (dom::window(), callback) else {
				return;
			};
			match w.set_interval_with_callback_and_timeout_and_arguments_0(
				cb.unchecked_ref(),
				TICK_MS,
			) {
				Ok(handle) => interval.set(Some(handle)),
				Err(e) => warn!("storm-fx: countdown timer failed: {:?}", e),
			}
		}
	};

	let update = {
		let (ended, stop) = (ended.clone(), stop.clone());
		move || {
			let state = CountdownState::at(target_ms, js_sys::Date::now());
			set_text.set(state.text());
			if state.is_ended() {
				ended.set(true);
				stop();
			}
		}
	};

	*tick.borrow_mut() = Some(Closure::new(update.clone()));

	let (vis_update, vis_start, vis_stop, vis_ended) =
		(update.clone(), start.clone(), stop.clone(), ended.clone());
	*visibility.borrow_mut() = Some(Closure::new(move || {
		if dom::page_hidden() {
			vis_stop();
		} else if !vis_ended.get() {
			vis_update();
			if !vis_ended.get() {
				vis_start();
			}
		}
	}));

	Effect::new(move |_| {
		let Some(cb) = visibility.borrow().as_ref().map(|c| c.as_ref().clone()) else {
			return;
		};
		if let Ok(document) = dom::document() {
			if let Err(e) = document
				.add_event_listener_with_callback("visibilitychange", cb.unchecked_ref())
			{
				warn!("storm-fx: countdown cannot watch visibility: {:?}", e);
			}
		}

		update();
		if ended.get() {
			debug!("storm-fx: countdown target already passed");
		} else if !dom::page_hidden() {
			start();
		}
	});

	view! { <p id="countdown" aria-live="polite">{move || text.get()}</p> }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_into_calendar_units() {
		let ms = ((2 * 86_400 + 3 * 3_600 + 4 * 60 + 5) * 1000 + 999) as f64;
		let r = Remaining::from_ms(ms);
		assert_eq!(
			r,
			Remaining {
				days: 2,
				hours: 3,
				minutes: 4,
				seconds: 5
			}
		);
		assert_eq!(r.to_string(), "2d 3h 4m 5s");
	}

	#[test]
	fn pending_before_target() {
		let c = CountdownState::at(10_000.0, 0.0);
		assert_eq!(c.text(), "0d 0h 0m 10s");
		assert!(!c.is_ended());
	}

	#[test]
	fn default_target_has_passed() {
		// 2026-10-16T00:00:00Z
		let now = 1_792_108_800_000.0;
		let target = resolve_target(None);
		let c = CountdownState::at(target, now);
		assert!(c.is_ended());
		let text = c.text();
		assert!(text.starts_with("Event has ended"), "{text}");
		let CountdownState::Ended(ago) = c else {
			unreachable!()
		};
		assert_eq!(ago.days, 628);
		assert_eq!((ago.hours, ago.minutes, ago.seconds), (15, 0, 0));
	}

	#[test]
	fn exactly_at_target_counts_as_ended() {
		assert_eq!(
			CountdownState::at(5_000.0, 5_000.0),
			CountdownState::Ended(Remaining::from_ms(0.0))
		);
	}

	#[test]
	fn unparseable_target_falls_back() {
		assert_eq!(resolve_target(Some(f64::NAN)), DEFAULT_TARGET_MS);
		assert_eq!(resolve_target(Some(42.0)), 42.0);
	}

	#[test]
	fn default_target_is_jan_25_2025_nine_gmt() {
		// 2025-01-01T00:00:00Z plus 24 days and 9 hours
		let expected = 1_735_689_600_000.0 + (24.0 * 86_400.0 + 9.0 * 3_600.0) * 1000.0;
		assert_eq!(DEFAULT_TARGET_MS, expected);
	}
}
