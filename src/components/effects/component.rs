//! Leptos component hosting the effect canvases.
//!
//! The component renders the fire and lightning canvases and, once mounted,
//! binds a [`Driver`] to them. The driver owns the [`Stage`], runs a single
//! `requestAnimationFrame` loop while any engine is running, arms the intro
//! cues with `setTimeout`, refits the surfaces on resize, and stops or
//! resumes on visibility changes.

use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlCanvasElement, ResizeObserver};

use super::config::EffectsConfig;
use super::fire::FireSimulator;
use super::lightning::LightningGenerator;
use super::render::CanvasPainter;
use super::stage::Stage;
use super::surface::{SizeSource, Surface, device_pixel_ratio};
use super::theme::Theme;
use crate::dom;
use crate::error::{FxError, FxResult};

type WebStage = Stage<CanvasPainter, ThreadRng>;

/// Event listener kept alive for as long as the driver and removed on drop.
struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut()>,
}

/// Browser-side scheduling around a [`Stage`].
pub struct Driver {
	stage: RefCell<WebStage>,
	source: SizeSource,
	debounce_ms: i32,
	frame_cb: RefCell<Option<Closure<dyn FnMut(f64)>>>,
	frame_id: Cell<Option<i32>>,
	resize_timer: Cell<Option<i32>>,
	listeners: RefCell<Vec<Listener>>,
	observer: RefCell<Option<(ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>>,
}

impl Driver {
	/// Build the stage over whichever canvases are usable and start it.
	///
	/// A canvas that is missing or has no 2D context is skipped; fails only
	/// when neither canvas is usable.
	pub fn install(
		config: &EffectsConfig,
		theme: &Theme,
		lightning: Option<HtmlCanvasElement>,
		fire: Option<HtmlCanvasElement>,
		source: SizeSource,
	) -> FxResult<Rc<Self>> {
		let motion_allowed = !dom::prefers_reduced_motion();
		let mut stage = WebStage::new(config.sequence.clone(), motion_allowed);
		let mut bound = 0;

		match lightning.map(CanvasPainter::attach) {
			Some(Ok(painter)) => {
				let engine =
					LightningGenerator::new(config.lightning.clone(), theme.clone(), rand::thread_rng());
				stage = stage.with_lightning(engine, Surface::new(painter));
				bound += 1;
			}
			Some(Err(e)) => warn!("storm-fx: lightning canvas unusable: {}", e),
			None => debug!("storm-fx: no lightning canvas"),
		}
		match fire.map(CanvasPainter::attach) {
			Some(Ok(painter)) => {
				let engine = FireSimulator::new(config.fire.clone(), theme.clone(), rand::thread_rng());
				stage = stage.with_fire(engine, Surface::new(painter));
				bound += 1;
			}
			Some(Err(e)) => warn!("storm-fx: fire canvas unusable: {}", e),
			None => debug!("storm-fx: no fire canvas"),
		}
		if bound == 0 {
			return Err(FxError::MissingElement("effects canvas"));
		}

		let driver = Rc::new(Self {
			stage: RefCell::new(stage),
			source,
			debounce_ms: config.resize_debounce_ms.min(i32::MAX as u32) as i32,
			frame_cb: RefCell::new(None),
			frame_id: Cell::new(None),
			resize_timer: Cell::new(None),
			listeners: RefCell::new(Vec::new()),
			observer: RefCell::new(None),
		});

		let weak = Rc::downgrade(&driver);
		*driver.frame_cb.borrow_mut() = Some(Closure::new(move |ts: f64| {
			if let Some(d) = weak.upgrade() {
				d.on_frame(ts);
			}
		}));

		driver.fit();
		driver.bind_resize()?;
		driver.bind_visibility()?;

		info!(
			"storm-fx: bound {} surface(s), motion {}",
			bound,
			if motion_allowed { "on" } else { "reduced" }
		);

		driver.stage.borrow_mut().ready(dom::now_ms());
		driver.schedule_cues();
		if dom::page_hidden() {
			driver.stage.borrow_mut().hide();
		}
		driver.resume_frames();
		Ok(driver)
	}

	/// Measure the size source and refit every surface. No-op when the
	/// source cannot be measured.
	pub fn fit(&self) {
		let Some((width, height)) = self.source.measure() else {
			return;
		};
		let ratio = device_pixel_ratio();
		self.stage.borrow_mut().resize(width, height, ratio);
		debug!(
			"storm-fx: surfaces fit to {:.0}x{:.0} @{}x",
			width, height, ratio
		);
	}

	/// The stage being driven.
	pub fn stage(&self) -> Ref<'_, Stage<CanvasPainter, ThreadRng>> {
		self.stage.borrow()
	}

	/// Whether an animation frame is currently requested.
	pub fn frame_pending(&self) -> bool {
		self.frame_id.get().is_some()
	}

	/// Stop everything while hidden; resume lightning when shown again.
	pub fn set_page_hidden(self: &Rc<Self>, hidden: bool) {
		if hidden {
			self.cancel_frame();
			self.stage.borrow_mut().hide();
			debug!("storm-fx: page hidden, effects stopped");
		} else {
			self.stage.borrow_mut().show(dom::now_ms());
			self.resume_frames();
			debug!("storm-fx: page visible");
		}
	}

	fn resume_frames(self: &Rc<Self>) {
		if self.stage.borrow().is_active() {
			self.request_frame();
		}
	}

	fn request_frame(&self) {
		if self.frame_id.get().is_some() {
			return;
		}
		let Ok(window) = dom::window() else {
			return;
		};
		if let Some(cb) = self.frame_cb.borrow().as_ref() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => self.frame_id.set(Some(id)),
				Err(e) => warn!("storm-fx: requestAnimationFrame failed: {:?}", e),
			}
		}
	}

	fn cancel_frame(&self) {
		if let Some(id) = self.frame_id.take() {
			if let Ok(window) = dom::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
	}

	fn on_frame(&self, ts: f64) {
		self.frame_id.set(None);
		let keep_going = self.stage.borrow_mut().frame(ts);
		if keep_going {
			self.request_frame();
		}
	}

	/// Arm one timer per distinct cue offset. Each timer only polls the
	/// sequence, so a timer firing after the intro was abandoned is inert.
	fn schedule_cues(self: &Rc<Self>) {
		let (ready_at, offsets) = {
			let stage = self.stage.borrow();
			(stage.ready_at(), stage.cue_offsets())
		};
		let Some(ready_at) = ready_at else {
			return;
		};
		for offset in offsets {
			let weak: Weak<Self> = Rc::downgrade(self);
			let armed = dom::set_timeout(
				move || {
					if let Some(d) = weak.upgrade() {
						let now = dom::now_ms().max(ready_at + offset);
						d.stage.borrow_mut().advance(now);
						d.resume_frames();
					}
				},
				offset.ceil() as i32,
			);
			if let Err(e) = armed {
				warn!("storm-fx: could not arm cue at {}ms: {}", offset, e);
			}
		}
	}

	fn on_visibility(self: &Rc<Self>) {
		self.set_page_hidden(dom::page_hidden());
	}

	fn on_window_resize(self: &Rc<Self>) {
		if let Some(pending) = self.resize_timer.take() {
			dom::clear_timeout(pending);
		}
		let weak = Rc::downgrade(self);
		match dom::set_timeout(
			move || {
				if let Some(d) = weak.upgrade() {
					d.resize_timer.set(None);
					d.fit();
				}
			},
			self.debounce_ms,
		) {
			Ok(handle) => self.resize_timer.set(Some(handle)),
			Err(e) => warn!("storm-fx: resize debounce failed: {}", e),
		}
	}

	fn bind_resize(self: &Rc<Self>) -> FxResult<()> {
		match &self.source {
			SizeSource::Window => {
				let weak = Rc::downgrade(self);
				let window = dom::window()?;
				self.listen(window.into(), "resize", move || {
					if let Some(d) = weak.upgrade() {
						d.on_window_resize();
					}
				})
			}
			SizeSource::Container(element) => {
				// Observer notifications are already coalesced per frame.
				let weak = Rc::downgrade(self);
				let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |_entries: js_sys::Array| {
					if let Some(d) = weak.upgrade() {
						d.fit();
					}
				});
				let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
				observer.observe(element);
				*self.observer.borrow_mut() = Some((observer, callback));
				Ok(())
			}
		}
	}

	fn bind_visibility(self: &Rc<Self>) -> FxResult<()> {
		let weak = Rc::downgrade(self);
		let document = dom::document()?;
		self.listen(document.into(), "visibilitychange", move || {
			if let Some(d) = weak.upgrade() {
				d.on_visibility();
			}
		})
	}

	fn listen(
		&self,
		target: EventTarget,
		event: &'static str,
		handler: impl FnMut() + 'static,
	) -> FxResult<()> {
		let callback = Closure::<dyn FnMut()>::new(handler);
		target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
		self.listeners.borrow_mut().push(Listener {
			target,
			event,
			callback,
		});
		Ok(())
	}
}

impl Drop for Driver {
	fn drop(&mut self) {
		self.cancel_frame();
		if let Some(pending) = self.resize_timer.take() {
			dom::clear_timeout(pending);
		}
		for l in self.listeners.get_mut().drain(..) {
			let _ = l
				.target
				.remove_event_listener_with_callback(l.event, l.callback.as_ref().unchecked_ref());
		}
		if let Some((observer, _)) = self.observer.get_mut().take() {
			observer.disconnect();
		}
	}
}

/// Renders the storm backdrop: a fire canvas (optional) under a lightning
/// canvas.
///
/// Surfaces follow the viewport by default; set `contained = true` to size
/// them to the parent element instead. With `fire = false` only lightning
/// runs and starts as soon as the page is ready.
#[component]
pub fn EffectsLayer(
	#[prop(default = EffectsConfig::default())] config: EffectsConfig,
	#[prop(default = Theme::default())] theme: Theme,
	#[prop(default = true)] fire: bool,
	#[prop(default = false)] contained: bool,
) -> impl IntoView {
	let lightning_ref = NodeRef::<leptos::html::Canvas>::new();
	let fire_ref = NodeRef::<leptos::html::Canvas>::new();
	let driver: Rc<RefCell<Option<Rc<Driver>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let lightning: Option<HtmlCanvasElement> = lightning_ref.get().map(Into::into);
		let fire_canvas: Option<HtmlCanvasElement> = fire_ref.get().map(Into::into);
		if driver.borrow().is_some() || (lightning.is_none() && fire_canvas.is_none()) {
			return;
		}

		let source = if contained {
			match lightning
				.as_ref()
				.or(fire_canvas.as_ref())
				.and_then(|c| c.parent_element())
			{
				Some(parent) => SizeSource::Container(parent),
				None => {
					warn!("storm-fx: no container to observe, following the window");
					SizeSource::Window
				}
			}
		} else {
			SizeSource::Window
		};

		match Driver::install(&config, &theme, lightning, fire_canvas, source) {
			Ok(d) => *driver.borrow_mut() = Some(d),
			Err(e) => warn!("storm-fx: effects disabled: {}", e),
		}
	});

	view! {
		<div class="fx-layer" aria-hidden="true">
			{fire.then(|| view! { <canvas node_ref=fire_ref id="fire" class="fx-canvas" /> })}
			<canvas node_ref=lightning_ref id="lightning" class="fx-canvas" />
		</div>
	}
}
