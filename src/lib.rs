//! storm-fx: storm backdrop effects for the StormFest landing page.
//!
//! This crate provides a WASM-based page shell with a canvas fire intro that
//! hands off to procedural lightning, an intro overlay, and an event
//! countdown.

use getrandom as _;
#[cfg(test)]
use wasm_bindgen_futures as _;
#[cfg(test)]
use wasm_bindgen_test as _;
use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod components;
pub mod config;
mod dom;
pub mod error;

pub use components::countdown::Countdown;
pub use components::effects::{EffectsConfig, EffectsLayer, Theme};
pub use components::intro::IntroOverlay;
pub use config::PageConfig;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("storm-fx: logging initialized");
}

/// Main application component.
/// Loads the page config from the DOM and renders the effects, intro and
/// countdown.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = config::load_page_config().unwrap_or_default();
	let theme = config.resolved_theme();
	let target = config::countdown_target();
	let PageConfig {
		title,
		tagline,
		enter_url,
		fire,
		effects,
		..
	} = config;
	let page_title = title.clone();
	let hero_title = title.clone();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text=page_title />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<EffectsLayer config=effects theme=theme fire=fire />
		<IntroOverlay title=title tagline=tagline enter_url=enter_url />

		<main id="main" tabindex="-1" class="hero">
			<h2>{hero_title}</h2>
			<Countdown target=target />
		</main>
	}
}
