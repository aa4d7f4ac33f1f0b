//! Fire particle simulation.
//!
//! Particles spawn in a narrow band near the bottom centre of the surface,
//! rise, grow and fade over a short lifetime. Each is painted as an additive
//! radial-gradient disc over a slowly fading background.

use std::collections::VecDeque;

use log::debug;
use rand::Rng;

use super::config::FireConfig;
use super::render::Painter;
use super::surface::Surface;
use super::theme::Theme;

/// A single flame particle.
#[derive(Clone, Debug)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Seconds since spawn.
	pub age: f64,
	/// Seconds until removal.
	pub lifetime: f64,
	/// Radius at spawn.
	pub size: f64,
	pub hue: f64,
}

impl Particle {
	/// Normalized age in [0, 1]
	pub fn age_ratio(&self) -> f64 {
		if self.lifetime <= 0.0 {
			1.0
		} else {
			(self.age / self.lifetime).min(1.0)
		}
	}

	pub fn alpha(&self) -> f64 {
		(1.0 - self.age_ratio()) * 0.9
	}

	pub fn radius(&self) -> f64 {
		self.size * (1.0 + self.age_ratio() * 0.6)
	}
}

/// Owns the live particle population; oldest first.
pub struct FireSimulator<R> {
	config: FireConfig,
	theme: Theme,
	rng: R,
	particles: VecDeque<Particle>,
	running: bool,
	last_tick: f64,
}

impl<R: Rng> FireSimulator<R> {
	pub fn new(config: FireConfig, theme: Theme, rng: R) -> Self {
		let capacity = config.max_particles + config.spawn_per_tick;
		Self {
			config,
			theme,
			rng,
			particles: VecDeque::with_capacity(capacity),
			running: false,
			last_tick: 0.0,
		}
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn particles(&self) -> impl Iterator<Item = &Particle> {
		self.particles.iter()
	}

	/// Start from an empty population and a cleared surface.
	pub fn start<P: Painter>(&mut self, now: f64, surface: &mut Surface<P>) {
		self.particles.clear();
		surface.clear();
		self.running = true;
		self.last_tick = now;
		debug!("storm-fx: fire started");
	}

	/// Stop, clear the surface and discard every particle. Returns whether it
	/// was running.
	pub fn stop<P: Painter>(&mut self, surface: &mut Surface<P>) -> bool {
		let was_running = std::mem::replace(&mut self.running, false);
		self.particles.clear();
		surface.clear();
		if was_running {
			debug!("storm-fx: fire stopped");
		}
		was_running
	}

	/// Advance one frame at time `now` (milliseconds).
	pub fn tick<P: Painter>(&mut self, now: f64, surface: &mut Surface<P>) {
		if !self.running {
			return;
		}
		let dt = ((now - self.last_tick) / 1000.0).clamp(0.0, self.config.max_dt.max(0.0));
		self.last_tick = now;

		let (width, height) = (surface.width(), surface.height());
		surface.painter.fade(
			width,
			height,
			self.theme.veil.with_alpha(self.config.fade_alpha),
		);

		for _ in 0..self.config.spawn_per_tick {
			let particle = self.spawn(width, height);
			self.particles.push_back(particle);
		}
		while self.particles.len() > self.config.max_particles {
			self.particles.pop_front();
		}

		let flame = &self.theme.flame;
		let painter = &mut surface.painter;
		self.particles.retain_mut(|p| {
			p.age += dt;
			if p.age >= p.lifetime {
				return false;
			}
			p.x += p.vx * dt * 60.0;
			p.y += p.vy * dt * 60.0;

			let stops = flame.gradient(p.hue, p.alpha());
			painter.glow(p.x, p.y, p.radius(), &stops);
			true
		});
	}

	fn spawn(&mut self, width: f64, height: f64) -> Particle {
		let c = &self.config;
		let rng = &mut self.rng;
		Particle {
			x: width * c.band_x.sample(rng),
			y: height * c.band_y.sample(rng),
			vx: c.drift.sample(rng),
			vy: -c.lift.sample(rng).abs(),
			age: 0.0,
			lifetime: c.lifetime.sample(rng),
			size: c.size.sample(rng),
			hue: c.hue.sample(rng),
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::config::Span;
	use super::super::render::recording::{Op, Recorder};
	use super::*;

	fn simulator(config: FireConfig) -> FireSimulator<StdRng> {
		FireSimulator::new(config, Theme::default(), StdRng::seed_from_u64(42))
	}

	fn surface() -> Surface<Recorder> {
		let mut s = Surface::new(Recorder::default());
		s.resize(1000.0, 600.0, 2.0);
		s.painter.take();
		s
	}

	#[test]
	fn spawns_within_emission_band() {
		let mut fire = simulator(FireConfig::default());
		let mut s = surface();
		fire.start(0.0, &mut s);
		fire.tick(0.0, &mut s);

		assert_eq!(fire.len(), 6);
		for p in fire.particles() {
			assert!((450.0..=550.0).contains(&p.x), "x={}", p.x);
			assert!((528.0..=570.0).contains(&p.y), "y={}", p.y);
			assert!(p.vy < 0.0);
			assert!(Span(0.6, 1.8).contains(p.lifetime));
			assert!(Span(8.0, 26.0).contains(p.size));
			assert!(Span(20.0, 50.0).contains(p.hue));
		}
	}

	#[test]
	fn population_never_exceeds_ceiling() {
		let config = FireConfig {
			max_particles: 50,
			lifetime: Span(30.0, 40.0),
			..FireConfig::default()
		};
		let mut fire = simulator(config);
		let mut s = surface();
		fire.start(0.0, &mut s);
		for frame in 1..200 {
			fire.tick(frame as f64 * 16.0, &mut s);
			assert!(fire.len() <= 50);
			s.painter.take();
		}
		assert_eq!(fire.len(), 50);
	}

	#[test]
	fn overflow_evicts_oldest_first() {
		let config = FireConfig {
			max_particles: 12,
			lifetime: Span(30.0, 40.0),
			..FireConfig::default()
		};
		let mut fire = simulator(config);
		let mut s = surface();
		fire.start(0.0, &mut s);
		for frame in 1..=5 {
			fire.tick(frame as f64 * 16.0, &mut s);
		}
		let ages: Vec<f64> = fire.particles().map(|p| p.age).collect();
		assert_eq!(ages.len(), 12);
		assert!(ages.windows(2).all(|w| w[0] >= w[1]));
		// Only the two youngest batches survive.
		assert!(ages[0] <= 0.016 * 2.0 + 1e-9);
	}

	#[test]
	fn ages_grow_and_expired_particles_disappear() {
		let config = FireConfig {
			spawn_per_tick: 0,
			..FireConfig::default()
		};
		let mut fire = simulator(config);
		let mut s = surface();
		fire.start(0.0, &mut s);
		fire.particles.push_back(Particle {
			x: 10.0,
			y: 10.0,
			vx: 1.0,
			vy: -2.0,
			age: 0.0,
			lifetime: 0.1,
			size: 10.0,
			hue: 30.0,
		});

		let mut last_age = 0.0;
		let mut now = 0.0;
		while !fire.is_empty() {
			now += 40.0;
			fire.tick(now, &mut s);
			if let Some(p) = fire.particles().next() {
				assert!(p.age >= last_age);
				assert!(p.age < p.lifetime);
				last_age = p.age;
			}
		}
		for _ in 0..3 {
			now += 40.0;
			fire.tick(now, &mut s);
			assert!(fire.is_empty());
		}
	}

	#[test]
	fn large_frame_gaps_are_capped() {
		let config = FireConfig {
			spawn_per_tick: 1,
			lifetime: Span(10.0, 10.0),
			drift: Span(0.0, 0.0),
			lift: Span(1.0, 1.0),
			..FireConfig::default()
		};
		let mut fire = simulator(config);
		let mut s = surface();
		fire.start(0.0, &mut s);
		fire.tick(0.0, &mut s);
		let y0 = fire.particles().next().map(|p| p.y).unwrap();
		fire.tick(5_000.0, &mut s);
		let p = fire.particles().next().unwrap();
		assert!((p.age - 0.05).abs() < 1e-9);
		assert!((y0 - p.y - 3.0).abs() < 1e-9);
	}

	#[test]
	fn particles_grow_and_fade_with_age() {
		let mut p = Particle {
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			age: 0.0,
			lifetime: 1.0,
			size: 10.0,
			hue: 30.0,
		};
		assert!((p.alpha() - 0.9).abs() < 1e-9);
		assert_eq!(p.radius(), 10.0);
		p.age = 0.5;
		assert!((p.alpha() - 0.45).abs() < 1e-9);
		assert!((p.radius() - 13.0).abs() < 1e-9);
	}

	#[test]
	fn each_tick_fades_then_glows_every_live_particle() {
		let mut fire = simulator(FireConfig::default());
		let mut s = surface();
		fire.start(0.0, &mut s);
		assert_eq!(s.painter.take(), vec![Op::Clear]);

		fire.tick(16.0, &mut s);
		let ops = s.painter.take();
		assert_eq!(ops[0], Op::Fade { alpha: 0.18 });
		let glows = ops.iter().filter(|op| matches!(op, Op::Glow { .. })).count();
		assert_eq!(glows, fire.len());
	}

	#[test]
	fn stop_discards_particles_and_is_idempotent() {
		let mut fire = simulator(FireConfig::default());
		let mut s = surface();
		fire.start(0.0, &mut s);
		fire.tick(16.0, &mut s);
		assert!(!fire.is_empty());

		assert!(fire.stop(&mut s));
		assert!(!fire.stop(&mut s));
		assert!(fire.is_empty());
		assert_eq!(s.painter.last(), Some(&Op::Clear));

		fire.tick(32.0, &mut s);
		assert!(fire.is_empty());
		assert_eq!(s.painter.last(), Some(&Op::Clear));
	}

	#[test]
	fn restart_begins_with_empty_population() {
		let mut fire = simulator(FireConfig::default());
		let mut s = surface();
		fire.start(0.0, &mut s);
		fire.tick(16.0, &mut s);
		fire.start(100.0, &mut s);
		assert!(fire.is_empty());
		assert!(fire.is_running());
	}
}
