//! Intro overlay shown over the page until dismissed.

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::dom;

/// Where the enter action ended up navigating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
	/// A new browsing context opened.
	NewContext,
	/// The popup was blocked or threw; navigate the current page instead.
	SameContext,
}

/// Decide from the result of `window.open` whether to fall back.
pub fn choose_navigation<W, E>(opened: Result<Option<W>, E>) -> Navigation {
	match opened {
		Ok(Some(_)) => Navigation::NewContext,
		Ok(None) | Err(_) => Navigation::SameContext,
	}
}

/// The URL the enter action should open, if one is configured.
pub fn enter_target(url: &str) -> Option<&str> {
	let url = url.trim();
	(!url.is_empty()).then_some(url)
}

fn open_url(url: &str) {
	let Ok(window) = dom::window() else {
		return;
	};
	match choose_navigation(window.open_with_url_and_target(url, "_blank")) {
		Navigation::NewContext => debug!("storm-fx: opened {} in a new tab", url),
		Navigation::SameContext => {
			debug!("storm-fx: popup blocked, navigating in place");
			if let Err(e) = window.location().set_href(url) {
				warn!("storm-fx: navigation to {} failed: {:?}", url, e);
			}
		}
	}
}

fn focus_main(main_id: &str) {
	let main = dom::document()
		.ok()
		.and_then(|d| d.get_element_by_id(main_id))
		.and_then(|el| el.dyn_into::<HtmlElement>().ok());
	match main {
		Some(el) => {
			let _ = el.focus();
		}
		None => debug!("storm-fx: no #{} to focus", main_id),
	}
}

/// Full-screen intro with an enter call-to-action and a skip button.
///
/// Dismissing sets `aria-hidden="true"` and the `leaving` class (the
/// stylesheet fades it out), then moves focus to `#{main_id}`. Enter
/// additionally opens `enter_url` in a new tab, or in place if blocked.
#[component]
pub fn IntroOverlay(
	#[prop(into)] title: String,
	#[prop(into, default = String::new())] tagline: String,
	#[prop(into)] enter_url: String,
	#[prop(default = "main")] main_id: &'static str,
) -> impl IntoView {
	let (hidden, set_hidden) = signal(false);

	let dismiss = move || {
		if hidden.get_untracked() {
			return;
		}
		set_hidden.set(true);
		focus_main(main_id);
	};

	let on_enter = move |_| {
		match enter_target(&enter_url) {
			Some(url) => open_url(url),
			None => debug!("storm-fx: no enter URL configured, dismissing only"),
		}
		dismiss();
	};
	let on_skip = move |_| dismiss();

	view! {
		<div
			id="intro"
			role="dialog"
			aria-modal="true"
			aria-hidden=move || if hidden.get() { "true" } else { "false" }
			class:leaving=move || hidden.get()
		>
			<h1>{title}</h1>
			<p>{tagline}</p>
			<button id="intro-enter" on:click=on_enter>"Enter"</button>
			<button id="intro-skip" class="outline" on:click=on_skip>"Skip intro"</button>
		</div>
	}
}
