//! Small helpers over `web_sys` shared by the components.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

use crate::error::{FxError, FxResult};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub(crate) fn window() -> FxResult<Window> {
	web_sys::window().ok_or(FxError::NoWindow)
}

pub(crate) fn document() -> FxResult<Document> {
	window()?.document().ok_or(FxError::NoDocument)
}

/// High-resolution timestamp in the same timebase as animation frames.
pub(crate) fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or_else(js_sys::Date::now)
}

/// Whether the user asked for reduced motion. Read once at mount.
pub(crate) fn prefers_reduced_motion() -> bool {
	web_sys::window()
		.and_then(|w| w.match_media(REDUCED_MOTION_QUERY).ok().flatten())
		.map(|mql| mql.matches())
		.unwrap_or(false)
}

pub(crate) fn page_hidden() -> bool {
	document().map(|d| d.hidden()).unwrap_or(false)
}

/// Runs `callback` once after `delay_ms`. Returns the timer handle.
pub(crate) fn set_timeout(callback: impl FnOnce() + 'static, delay_ms: i32) -> FxResult<i32> {
	let callback = Closure::once_into_js(callback);
	let handle = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
		callback.unchecked_ref(),
		delay_ms.max(0),
	)?;
	Ok(handle)
}

pub(crate) fn clear_timeout(handle: i32) {
	if let Ok(w) = window() {
		w.clear_timeout_with_handle(handle);
	}
}
