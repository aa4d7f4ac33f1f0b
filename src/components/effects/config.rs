//! Load-time tuning for the effects engines.
//!
//! Every field has a default, so a page may override only what it needs:
//!
//! ```json
//! { "effects": { "fire": { "max_particles": 500 }, "sequence": { "delay_ms": 4000 } } }
//! ```

use rand::Rng;
use serde::Deserialize;

/// An inclusive `[min, max]` range sampled uniformly. Written as a two-element
/// JSON array.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Span(pub f64, pub f64);

impl Span {
	/// Lower bound, whichever order the ends were given in.
	pub fn min(self) -> f64 {
		self.0.min(self.1)
	}

	/// Upper bound, whichever order the ends were given in.
	pub fn max(self) -> f64 {
		self.0.max(self.1)
	}

	/// Uniform sample. A degenerate span always yields its single value.
	pub fn sample<R: Rng>(self, rng: &mut R) -> f64 {
		let (lo, hi) = (self.min(), self.max());
		if hi > lo { rng.gen_range(lo..=hi) } else { lo }
	}

	/// True when `value` lies within the span.
	pub fn contains(self, value: f64) -> bool {
		value >= self.min() && value <= self.max()
	}
}

/// Lightning generator tuning. Times are milliseconds, distances logical pixels.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LightningConfig {
	/// Opacity of the black veil painted each tick instead of clearing.
	pub fade_alpha: f64,
	/// Delay before the first strike after start.
	pub first_interval: Span,
	/// Delay between subsequent strikes.
	pub interval: Span,
	/// Chance that a strike event becomes a multi-strike flicker.
	pub flicker_chance: f64,
	/// Most strikes drawn in one flicker.
	pub flicker_max: u32,
	/// Horizontal jitter as a fraction of surface width.
	pub jitter_scale: f64,
	/// Bounds the jitter magnitude regardless of width.
	pub jitter: Span,
	/// Vertical advance per segment.
	pub step: Span,
	/// Chance of a single branch per strike.
	pub branch_chance: f64,
	/// Branches start within this top fraction of the surface.
	pub branch_region: f64,
	/// Segment count range for a branch.
	pub branch_segments: (u32, u32),
}

impl Default for LightningConfig {
	fn default() -> Self {
		Self {
			fade_alpha: 0.07,
			first_interval: Span(800.0, 4500.0),
			interval: Span(1200.0, 6000.0),
			flicker_chance: 0.25,
			flicker_max: 3,
			jitter_scale: 0.04,
			jitter: Span(40.0, 60.0),
			step: Span(20.0, 60.0),
			branch_chance: 0.4,
			branch_region: 0.6,
			branch_segments: (5, 6),
		}
	}
}

/// Fire simulator tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FireConfig {
	/// Opacity of the black veil painted each tick. Weaker than lightning's
	/// so flames linger.
	pub fade_alpha: f64,
	/// Particles spawned per tick.
	pub spawn_per_tick: usize,
	/// Population ceiling; oldest particles are evicted beyond it.
	pub max_particles: usize,
	/// Emission band as fractions of surface width.
	pub band_x: Span,
	/// Emission band as fractions of surface height.
	pub band_y: Span,
	/// Horizontal velocity, logical px per 60 Hz frame.
	pub drift: Span,
	/// Upward speed magnitude, logical px per 60 Hz frame.
	pub lift: Span,
	/// Particle lifetime in seconds.
	pub lifetime: Span,
	/// Base particle radius.
	pub size: Span,
	/// Hue in degrees.
	pub hue: Span,
	/// Largest time step applied in one tick, in seconds.
	pub max_dt: f64,
}

impl Default for FireConfig {
	fn default() -> Self {
		Self {
			fade_alpha: 0.18,
			spawn_per_tick: 6,
			max_particles: 700,
			band_x: Span(0.45, 0.55),
			band_y: Span(0.88, 0.95),
			drift: Span(-0.6, 0.6),
			lift: Span(1.2, 3.2),
			lifetime: Span(0.6, 1.8),
			size: Span(8.0, 26.0),
			hue: Span(20.0, 50.0),
			max_dt: 0.05,
		}
	}
}

/// Timing of the fire intro and the hand-off to lightning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
	/// Delay from page-ready until fire starts.
	pub delay_ms: f64,
	/// How long fire runs.
	pub duration_ms: f64,
	/// Start lightning when fire stops.
	pub chain_lightning: bool,
}

impl Default for SequenceConfig {
	fn default() -> Self {
		Self {
			delay_ms: 8000.0,
			duration_ms: 6000.0,
			chain_lightning: true,
		}
	}
}

/// All effects tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
	/// Lightning generator tuning.
	pub lightning: LightningConfig,
	/// Fire simulator tuning.
	pub fire: FireConfig,
	/// Fire intro sequence.
	pub sequence: SequenceConfig,
	/// Quiet period before a window resize refits the surfaces.
	pub resize_debounce_ms: u32,
}

impl Default for EffectsConfig {
	fn default() -> Self {
		Self {
			lightning: LightningConfig::default(),
			fire: FireConfig::default(),
			sequence: SequenceConfig::default(),
			resize_debounce_ms: 130,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn span_samples_stay_in_range_even_when_reversed() {
		let mut rng = StdRng::seed_from_u64(7);
		let span = Span(60.0, 20.0);
		for _ in 0..500 {
			let v = span.sample(&mut rng);
			assert!(span.contains(v), "{v} outside {span:?}");
		}
	}

	#[test]
	fn degenerate_span_yields_its_value() {
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(Span(3.5, 3.5).sample(&mut rng), 3.5);
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let json = r#"{ "fire": { "max_particles": 500 }, "sequence": { "chain_lightning": false } }"#;
		let config: EffectsConfig = serde_json::from_str(json).unwrap();
		assert_eq!(config.fire.max_particles, 500);
		assert_eq!(config.fire.spawn_per_tick, 6);
		assert!(!config.sequence.chain_lightning);
		assert_eq!(config.sequence.delay_ms, 8000.0);
		assert_eq!(config.lightning.interval, Span(1200.0, 6000.0));
		assert_eq!(config.resize_debounce_ms, 130);
	}

	#[test]
	fn spans_parse_from_arrays() {
		let json = r#"{ "interval": [500, 900] }"#;
		let config: LightningConfig = serde_json::from_str(json).unwrap();
		assert_eq!(config.interval, Span(500.0, 900.0));
	}
}
