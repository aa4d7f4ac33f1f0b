//! Errors raised while binding effects to the page.
//!
//! None of these reach the page: the component boundary logs them and
//! degrades to whatever surfaces are still usable.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure to reach a DOM element or drawing context.
#[derive(Debug, Error)]
pub enum FxError {
	/// No `window` (not running in a browser main thread).
	#[error("no window available")]
	NoWindow,
	/// No `document` attached to the window.
	#[error("no document available")]
	NoDocument,
	/// A required element is missing from the page.
	#[error("element `{0}` not found")]
	MissingElement(&'static str),
	/// The canvas does not support a 2D drawing context.
	#[error("2d context unavailable")]
	ContextUnavailable,
	/// A browser API call threw.
	#[error("browser call failed: {0}")]
	Js(String),
}

impl From<JsValue> for FxError {
	fn from(value: JsValue) -> Self {
		FxError::Js(
			value
				.as_string()
				.unwrap_or_else(|| format!("{value:?}")),
		)
	}
}

/// Result alias for the binding layer.
pub type FxResult<T> = Result<T, FxError>;
