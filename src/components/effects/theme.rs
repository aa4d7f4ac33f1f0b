//! Visual theming for the storm effects.
//!
//! Colors and stroke styles live here; timing and population tuning live in
//! [`super::config`].

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// HSLA color, used for flame gradients where hue is the sampled quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
	/// Hue in degrees, wrapped into `[0, 360)` when formatted.
	pub h: f64,
	/// Saturation percentage.
	pub s: f64,
	/// Lightness percentage.
	pub l: f64,
	pub a: f64,
}

impl Hsla {
	pub fn to_css(self) -> String {
		format!(
			"hsla({:.1}, {:.0}%, {:.0}%, {:.3})",
			self.h.rem_euclid(360.0),
			self.s.clamp(0.0, 100.0),
			self.l.clamp(0.0, 100.0),
			self.a.clamp(0.0, 1.0)
		)
	}
}

/// Stroke used for a bolt or a branch.
#[derive(Clone, Copy, Debug)]
pub struct StrokeStyle {
	pub color: Color,
	/// Line width in logical pixels.
	pub width: f64,
}

/// One stop of the flame gradient, relative to the particle's sampled hue.
#[derive(Clone, Copy, Debug)]
pub struct FlameStop {
	/// Gradient offset in `[0, 1]`.
	pub offset: f32,
	/// Added to the particle hue (negative shifts toward red).
	pub hue_shift: f64,
	pub lightness: f64,
	/// Multiplied into the particle's current alpha.
	pub alpha_scale: f64,
}

/// Radial gradient painted for every fire particle.
#[derive(Clone, Debug)]
pub struct FlameStyle {
	pub stops: Vec<FlameStop>,
}

impl FlameStyle {
	/// Resolve the stops for a particle of `hue` at `alpha`.
	pub fn gradient(&self, hue: f64, alpha: f64) -> Vec<(f32, Hsla)> {
		self.stops
			.iter()
			.map(|stop| {
				(
					stop.offset,
					Hsla {
						h: hue + stop.hue_shift,
						s: 100.0,
						l: stop.lightness,
						a: alpha * stop.alpha_scale,
					},
				)
			})
			.collect()
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	/// Color of the veil painted instead of clearing. Alpha comes from config.
	pub veil: Color,
	pub bolt: StrokeStyle,
	pub branch: StrokeStyle,
	pub flame: FlameStyle,
}

impl Theme {
	/// Electric blue-white bolts over black, orange flames (default)
	pub fn storm() -> Self {
		Self {
			name: "storm",
			veil: Color::rgb(0, 0, 0),
			bolt: StrokeStyle {
				color: Color::rgba(215, 240, 255, 0.92),
				width: 1.8,
			},
			branch: StrokeStyle {
				color: Color::rgba(170, 220, 255, 0.55),
				width: 1.0,
			},
			flame: FlameStyle {
				stops: vec![
					FlameStop {
						offset: 0.0,
						hue_shift: 0.0,
						lightness: 65.0,
						alpha_scale: 1.0,
					},
					FlameStop {
						offset: 0.35,
						hue_shift: -10.0,
						lightness: 50.0,
						alpha_scale: 0.6,
					},
					FlameStop {
						offset: 0.7,
						hue_shift: -20.0,
						lightness: 30.0,
						alpha_scale: 0.25,
					},
					FlameStop {
						offset: 1.0,
						hue_shift: -25.0,
						lightness: 15.0,
						alpha_scale: 0.0,
					},
				],
			},
		}
	}

	/// Cooler variant: cyan bolts matching the page accent, redder flames.
	pub fn accent() -> Self {
		let mut theme = Self::storm();
		theme.name = "accent";
		theme.bolt.color = Color::rgba(125, 249, 255, 0.95);
		theme.branch.color = Color::rgba(125, 249, 255, 0.5);
		for stop in &mut theme.flame.stops {
			stop.hue_shift -= 8.0;
		}
		theme
	}

	/// Look up a preset by name.
	pub fn named(name: &str) -> Option<Self> {
		match name {
			"storm" => Some(Self::storm()),
			"accent" => Some(Self::accent()),
			_ => None,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::storm()
	}
}
