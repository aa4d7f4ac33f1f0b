//! Procedural lightning strikes with a trailing afterglow.
//!
//! The surface is never cleared while running. Each tick paints a faint
//! black veil over it, so every strike decays over the following frames.
//! Strikes are drawn once and not kept.

use log::debug;
use rand::Rng;

use super::config::{LightningConfig, Span};
use super::render::Painter;
use super::surface::Surface;
use super::theme::Theme;

/// One bolt: a trunk from the top edge to the bottom edge and an optional
/// branch.
#[derive(Clone, Debug, Default)]
pub struct Strike {
	pub trunk: Vec<(f64, f64)>,
	pub branch: Option<Vec<(f64, f64)>>,
}

/// Draws strikes on a randomized schedule while running.
pub struct LightningGenerator<R> {
	config: LightningConfig,
	theme: Theme,
	rng: R,
	running: bool,
	last_strike: f64,
	next_interval: f64,
	strikes: u64,
}

impl<R: Rng> LightningGenerator<R> {
	pub fn new(config: LightningConfig, theme: Theme, rng: R) -> Self {
		Self {
			config,
			theme,
			rng,
			running: false,
			last_strike: 0.0,
			next_interval: 0.0,
			strikes: 0,
		}
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Time of the most recent strike event (or of start).
	pub fn last_strike(&self) -> f64 {
		self.last_strike
	}

	/// Delay after [`Self::last_strike`] before the next strike event.
	pub fn next_interval(&self) -> f64 {
		self.next_interval
	}

	/// Strikes drawn since construction.
	pub fn strikes(&self) -> u64 {
		self.strikes
	}

	/// Begin striking. Does nothing when already running.
	pub fn start<P: Painter>(&mut self, now: f64, surface: &mut Surface<P>) {
		if self.running {
			return;
		}
		surface.clear();
		self.running = true;
		self.last_strike = now;
		self.next_interval = self.config.first_interval.sample(&mut self.rng);
		debug!(
			"storm-fx: lightning started, first strike in {:.0}ms",
			self.next_interval
		);
	}

	/// Stop and clear the surface. Returns whether it was running.
	pub fn stop<P: Painter>(&mut self, surface: &mut Surface<P>) -> bool {
		let was_running = std::mem::replace(&mut self.running, false);
		self.next_interval = 0.0;
		surface.clear();
		if was_running {
			debug!("storm-fx: lightning stopped");
		}
		was_running
	}

	/// Advance one frame. Returns the number of strikes drawn.
	pub fn tick<P: Painter>(&mut self, now: f64, surface: &mut Surface<P>) -> usize {
		if !self.running {
			return 0;
		}
		let (width, height) = (surface.width(), surface.height());

		surface.painter.fade(
			width,
			height,
			self.theme.veil.with_alpha(self.config.fade_alpha),
		);

		let elapsed = (now - self.last_strike).max(0.0);
		if elapsed <= self.next_interval {
			return 0;
		}

		let count = if self.rng.gen_bool(self.config.flicker_chance.clamp(0.0, 1.0)) {
			self.rng.gen_range(1..=self.config.flicker_max.max(1)) as usize
		} else {
			1
		};
		for _ in 0..count {
			let strike = self.plan_strike(width, height);
			self.draw(&strike, surface);
		}

		self.strikes += count as u64;
		self.last_strike = now;
		self.next_interval = self.config.interval.sample(&mut self.rng);
		count
	}

	/// Lay out a strike for a `width` × `height` surface.
	pub fn plan_strike(&mut self, width: f64, height: f64) -> Strike {
		let jitter = self.jitter(width);
		let step = Span(self.config.step.min().max(1.0), self.config.step.max().max(1.0));

		let mut x = self.rng.gen_range(0.0..=width.max(0.0));
		let mut y = 0.0;
		let mut trunk = vec![(x, y)];
		while y < height {
			x += self.rng.gen_range(-jitter..=jitter);
			y = (y + step.sample(&mut self.rng)).min(height);
			trunk.push((x, y));
		}

		let branch = self
			.rng
			.gen_bool(self.config.branch_chance.clamp(0.0, 1.0))
			.then(|| self.plan_branch(width, height, jitter * 0.5, step));

		Strike { trunk, branch }
	}

	fn plan_branch(&mut self, width: f64, height: f64, jitter: f64, step: Span) -> Vec<(f64, f64)> {
		let region = height.max(0.0) * self.config.branch_region.clamp(0.0, 1.0);
		let mut x = self.rng.gen_range(0.0..=width.max(0.0));
		let mut y = self.rng.gen_range(0.0..=region);

		let (lo, hi) = self.config.branch_segments;
		let segments = self.rng.gen_range(lo.min(hi)..=lo.max(hi)).max(1);

		let mut points = Vec::with_capacity(segments as usize + 1);
		points.push((x, y));
		for _ in 0..segments {
			x += self.rng.gen_range(-jitter..=jitter);
			y += step.sample(&mut self.rng) * 0.5;
			points.push((x, y));
		}
		points
	}

	fn jitter(&self, width: f64) -> f64 {
		(width * self.config.jitter_scale).clamp(self.config.jitter.min(), self.config.jitter.max())
	}

	fn draw<P: Painter>(&self, strike: &Strike, surface: &mut Surface<P>) {
		surface.painter.stroke_path(&strike.trunk, self.theme.bolt);
		if let Some(branch) = &strike.branch {
			surface.painter.stroke_path(branch, self.theme.branch);
		}
	}
}
