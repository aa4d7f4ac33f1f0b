//! Page configuration embedded in the host HTML.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::components::effects::{EffectsConfig, Theme};
use crate::dom;

/// Id of the `<script type="application/json">` element holding [`PageConfig`].
pub const CONFIG_ELEMENT_ID: &str = "fx-config";

/// Attribute on `<body>` carrying the countdown target date.
pub const COUNTDOWN_ATTRIBUTE: &str = "data-countdown-target";

/// Everything the page can tune at load time.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PageConfig {
	/// Event name shown in the intro and hero.
	pub title: String,
	/// Short line under the intro title.
	pub tagline: String,
	/// Opened by the intro's enter button.
	pub enter_url: String,
	/// Theme preset name (see [`Theme::named`]).
	pub theme: String,
	/// Render the fire intro canvas.
	pub fire: bool,
	/// Engine tuning.
	pub effects: EffectsConfig,
}

impl Default for PageConfig {
	fn default() -> Self {
		Self {
			title: "StormFest".into(),
			tagline: "Where the storm begins.".into(),
			enter_url: String::new(),
			theme: "storm".into(),
			fire: true,
			effects: EffectsConfig::default(),
		}
	}
}

impl PageConfig {
	/// Parse from JSON, where any omitted field keeps its default.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// The theme preset, or the default when the name is unknown.
	pub fn resolved_theme(&self) -> Theme {
		Theme::named(&self.theme).unwrap_or_else(|| {
			warn!("storm-fx: unknown theme '{}', using default", self.theme);
			Theme::default()
		})
	}
}

/// Load the page config from `<script id="fx-config">`.
/// Returns `None` when the element is absent or its JSON is invalid.
pub fn load_page_config() -> Option<PageConfig> {
	let document = dom::document().ok()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match PageConfig::from_json(&json_text) {
		Ok(config) => {
			info!("storm-fx: loaded page config '{}'", config.title);
			Some(config)
		}
		Err(e) => {
			warn!("storm-fx: failed to parse page config: {}", e);
			None
		}
	}
}

/// Countdown target date string from the host page, if any.
pub fn countdown_target() -> Option<String> {
	dom::document()
		.ok()?
		.body()?
		.get_attribute(COUNTDOWN_ATTRIBUTE)
		.filter(|v| !v.trim().is_empty())
}
