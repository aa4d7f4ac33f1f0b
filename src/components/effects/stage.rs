//! Per-page orchestration of the effects.
//!
//! A [`Stage`] owns whichever surfaces the page provided, their engines and
//! the fire intro sequence. Several stages can coexist; nothing here is
//! global. The reduced-motion decision is fixed at construction.

use log::info;
use rand::Rng;

use super::config::SequenceConfig;
use super::fire::FireSimulator;
use super::lightning::LightningGenerator;
use super::render::Painter;
use super::sequencer::{Cue, Sequencer};
use super::surface::Surface;

/// An engine bound to the surface it draws on.
pub struct Bound<E, P> {
	pub engine: E,
	pub surface: Surface<P>,
}

/// Lightning, optional fire, and the intro sequence for one page.
pub struct Stage<P, R> {
	lightning: Option<Bound<LightningGenerator<R>, P>>,
	fire: Option<Bound<FireSimulator<R>, P>>,
	sequence: SequenceConfig,
	sequencer: Option<Sequencer>,
	motion_allowed: bool,
	ready_at: Option<f64>,
}

impl<P: Painter, R: Rng> Stage<P, R> {
	pub fn new(sequence: SequenceConfig, motion_allowed: bool) -> Self {
		Self {
			lightning: None,
			fire: None,
			sequence,
			sequencer: None,
			motion_allowed,
			ready_at: None,
		}
	}

	pub fn with_lightning(mut self, engine: LightningGenerator<R>, surface: Surface<P>) -> Self {
		self.lightning = Some(Bound { engine, surface });
		self
	}

	/// Bind the fire surface. The intro sequence only exists with one.
	pub fn with_fire(mut self, engine: FireSimulator<R>, surface: Surface<P>) -> Self {
		self.fire = Some(Bound { engine, surface });
		self.sequencer = Some(Sequencer::new(&self.sequence));
		self
	}

	pub fn motion_allowed(&self) -> bool {
		self.motion_allowed
	}

	pub fn ready_at(&self) -> Option<f64> {
		self.ready_at
	}

	pub fn lightning(&self) -> Option<&LightningGenerator<R>> {
		self.lightning.as_ref().map(|b| &b.engine)
	}

	pub fn fire(&self) -> Option<&FireSimulator<R>> {
		self.fire.as_ref().map(|b| &b.engine)
	}

	pub fn lightning_running(&self) -> bool {
		self.lightning().is_some_and(|l| l.is_running())
	}

	pub fn fire_running(&self) -> bool {
		self.fire().is_some_and(|f| f.is_running())
	}

	/// True while any engine wants animation frames.
	pub fn is_active(&self) -> bool {
		self.lightning_running() || self.fire_running()
	}

	/// Offsets from page-ready at which the sequence needs polling.
	pub fn cue_offsets(&self) -> Vec<f64> {
		let mut offsets: Vec<f64> = self
			.sequencer
			.iter()
			.flat_map(|s| s.timeline().iter().map(|(offset, _)| *offset))
			.collect();
		offsets.dedup();
		offsets
	}

	/// Page is ready: arm the sequence, or start lightning directly when no
	/// fire intro will hand off to it.
	pub fn ready(&mut self, now: f64) {
		if self.ready_at.is_some() {
			return;
		}
		if !self.motion_allowed {
			info!("storm-fx: reduced motion preferred, effects disabled");
			return;
		}
		self.ready_at = Some(now);

		let chained = self.sequencer.as_ref().is_some_and(|s| s.chains_lightning());
		if !chained {
			self.start_lightning(now);
		}
		self.advance(now);
	}

	/// Apply every sequence cue due at `now`.
	pub fn advance(&mut self, now: f64) {
		let Some(ready_at) = self.ready_at else {
			return;
		};
		let cues = match self.sequencer.as_mut() {
			Some(seq) => seq.due(now - ready_at),
			None => return,
		};
		for cue in cues {
			self.apply(cue, now);
		}
	}

	/// One animation frame. Returns whether another frame is wanted.
	pub fn frame(&mut self, now: f64) -> bool {
		self.advance(now);
		if let Some(b) = self.fire.as_mut() {
			b.engine.tick(now, &mut b.surface);
		}
		if let Some(b) = self.lightning.as_mut() {
			b.engine.tick(now, &mut b.surface);
		}
		self.is_active()
	}

	/// Page hidden: stop everything. The fire intro is abandoned for good.
	pub fn hide(&mut self) {
		if let Some(b) = self.fire.as_mut() {
			b.engine.stop(&mut b.surface);
		}
		if let Some(b) = self.lightning.as_mut() {
			b.engine.stop(&mut b.surface);
		}
		if let Some(seq) = self.sequencer.as_mut() {
			seq.abandon();
		}
	}

	/// Page visible again: only lightning resumes, with a fresh schedule.
	pub fn show(&mut self, now: f64) {
		if self.ready_at.is_none() {
			return;
		}
		let sequence_pending = self.sequencer.as_ref().is_some_and(|s| !s.is_finished());
		if !sequence_pending {
			self.start_lightning(now);
		}
	}

	/// Refit every bound surface to a new logical size.
	pub fn resize(&mut self, width: f64, height: f64, ratio: f64) {
		if let Some(b) = self.lightning.as_mut() {
			b.surface.resize(width, height, ratio);
		}
		if let Some(b) = self.fire.as_mut() {
			b.surface.resize(width, height, ratio);
		}
	}

	fn apply(&mut self, cue: Cue, now: f64) {
		info!("storm-fx: sequence cue {:?}", cue);
		match cue {
			Cue::StartFire => {
				if let Some(b) = self.fire.as_mut() {
					b.engine.start(now, &mut b.surface);
				}
			}
			Cue::StopFire => {
				if let Some(b) = self.fire.as_mut() {
					b.engine.stop(&mut b.surface);
				}
			}
			Cue::StartLightning => self.start_lightning(now),
		}
	}

	fn start_lightning(&mut self, now: f64) {
		if !self.motion_allowed {
			return;
		}
		if let Some(b) = self.lightning.as_mut() {
			b.engine.start(now, &mut b.surface);
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::config::{FireConfig, LightningConfig};
	use super::super::render::recording::Recorder;
	use super::super::theme::Theme;
	use super::*;

	type TestStage = Stage<Recorder, StdRng>;

	fn lightning() -> LightningGenerator<StdRng> {
		LightningGenerator::new(
			LightningConfig::default(),
			Theme::default(),
			StdRng::seed_from_u64(1),
		)
	}

	fn fire() -> FireSimulator<StdRng> {
		FireSimulator::new(FireConfig::default(), Theme::default(), StdRng::seed_from_u64(2))
	}

	fn surface() -> Surface<Recorder> {
		let mut s = Surface::new(Recorder::default());
		s.resize(800.0, 600.0, 1.0);
		s
	}

	fn sequence(chain: bool) -> SequenceConfig {
		SequenceConfig {
			delay_ms: 8000.0,
			duration_ms: 6000.0,
			chain_lightning: chain,
		}
	}

	fn full_stage(chain: bool, motion: bool) -> TestStage {
		Stage::new(sequence(chain), motion)
			.with_lightning(lightning(), surface())
			.with_fire(fire(), surface())
	}

	#[test]
	fn fire_intro_hands_off_to_lightning() {
		let mut stage = full_stage(true, true);
		stage.ready(0.0);
		assert!(!stage.fire_running());
		assert!(!stage.lightning_running());

		stage.advance(7_999.0);
		assert!(!stage.fire_running());

		stage.advance(8_000.0);
		assert!(stage.fire_running());
		assert!(!stage.lightning_running());

		for frame in 0..100 {
			assert!(stage.frame(8_000.0 + frame as f64 * 16.0));
		}
		assert!(stage.fire().is_some_and(|f| !f.is_empty()));

		stage.advance(14_000.0);
		assert!(!stage.fire_running());
		assert!(stage.fire().is_some_and(|f| f.is_empty()));
		assert!(stage.lightning_running());
	}

	#[test]
	fn reduced_motion_never_starts_anything() {
		let mut stage = full_stage(true, false);
		assert!(!stage.motion_allowed());
		stage.ready(0.0);
		assert_eq!(stage.ready_at(), None);
		for t in [0.0, 8_000.0, 14_000.0, 60_000.0] {
			assert!(!stage.frame(t));
			assert!(!stage.fire_running());
			assert!(!stage.lightning_running());
		}
		stage.hide();
		stage.show(70_000.0);
		assert!(!stage.lightning_running());
	}

	#[test]
	fn lightning_starts_immediately_without_fire_surface() {
		let mut stage: TestStage =
			Stage::new(sequence(true), true).with_lightning(lightning(), surface());
		stage.ready(5.0);
		assert!(stage.lightning_running());
		assert!(stage.cue_offsets().is_empty());
	}

	#[test]
	fn unchained_fire_runs_alongside_lightning() {
		let mut stage = full_stage(false, true);
		stage.ready(0.0);
		assert!(stage.lightning_running());
		stage.advance(8_000.0);
		assert!(stage.fire_running());
		stage.advance(14_000.0);
		assert!(!stage.fire_running());
		assert!(stage.lightning_running());
	}

	#[test]
	fn fire_alone_runs_its_intro() {
		let mut stage: TestStage =
			Stage::new(sequence(true), true).with_fire(fire(), surface());
		stage.ready(0.0);
		stage.advance(8_000.0);
		assert!(stage.fire_running());
		stage.advance(14_000.0);
		assert!(!stage.is_active());
	}

	#[test]
	fn hiding_mid_intro_abandons_fire_and_showing_resumes_lightning() {
		let mut stage = full_stage(true, true);
		stage.ready(0.0);
		stage.advance(9_000.0);
		assert!(stage.fire_running());

		stage.hide();
		assert!(!stage.is_active());

		stage.show(10_000.0);
		assert!(stage.lightning_running());
		stage.advance(14_000.0);
		assert!(!stage.fire_running());
	}

	#[test]
	fn show_before_intro_finishes_does_not_preempt_it() {
		let mut stage = full_stage(true, true);
		stage.ready(0.0);
		stage.show(1_000.0);
		assert!(!stage.lightning_running());
	}

	#[test]
	fn hide_twice_is_harmless() {
		let mut stage = full_stage(false, true);
		stage.ready(0.0);
		stage.hide();
		stage.hide();
		assert!(!stage.is_active());
	}

	#[test]
	fn cue_offsets_are_distinct() {
		let stage = full_stage(true, true);
		assert_eq!(stage.cue_offsets(), vec![8_000.0, 14_000.0]);
	}

	#[test]
	fn resize_reaches_every_surface() {
		let mut stage = full_stage(true, true);
		stage.resize(1024.0, 768.0, 2.0);
		let l = stage.lightning.as_ref().unwrap();
		let f = stage.fire.as_ref().unwrap();
		assert_eq!(l.surface.size.pixel_width, 2048);
		assert_eq!(f.surface.size.pixel_height, 1536);
	}
}
