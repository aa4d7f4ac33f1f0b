//! Device-pixel-ratio aware sizing of drawing surfaces.
//!
//! A surface has a logical size in CSS pixels, which all drawing uses, and a
//! physical buffer of `floor(logical × ratio)` pixels (never smaller than
//! 1×1). The painter installs a `ratio` scale transform so the two line up.

use web_sys::Element;

use super::render::Painter;

/// Logical and physical dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
	pub logical_width: f64,
	pub logical_height: f64,
	/// Effective device pixel ratio, at least 1.
	pub ratio: f64,
	pub pixel_width: u32,
	pub pixel_height: u32,
}

impl SurfaceSize {
	/// Size a surface for a logical box and a reported device pixel ratio.
	///
	/// Negative or non-finite dimensions count as zero; a non-finite or
	/// sub-unit ratio counts as 1.
	pub fn compute(logical_width: f64, logical_height: f64, reported_ratio: f64) -> Self {
		let ratio = if reported_ratio.is_finite() {
			reported_ratio.max(1.0)
		} else {
			1.0
		};
		let logical_width = sanitize(logical_width);
		let logical_height = sanitize(logical_height);

		Self {
			logical_width,
			logical_height,
			ratio,
			pixel_width: physical(logical_width, ratio),
			pixel_height: physical(logical_height, ratio),
		}
	}
}

impl Default for SurfaceSize {
	fn default() -> Self {
		Self::compute(0.0, 0.0, 1.0)
	}
}

fn sanitize(v: f64) -> f64 {
	if v.is_finite() { v.max(0.0) } else { 0.0 }
}

fn physical(logical: f64, ratio: f64) -> u32 {
	((logical * ratio).floor() as u32).max(1)
}

/// A painter bound to its current size.
pub struct Surface<P> {
	pub painter: P,
	pub size: SurfaceSize,
}

impl<P: Painter> Surface<P> {
	pub fn new(painter: P) -> Self {
		Self {
			painter,
			size: SurfaceSize::default(),
		}
	}

	pub fn width(&self) -> f64 {
		self.size.logical_width
	}

	pub fn height(&self) -> f64 {
		self.size.logical_height
	}

	/// Recompute the size and push it to the painter.
	pub fn resize(&mut self, logical_width: f64, logical_height: f64, reported_ratio: f64) {
		self.size = SurfaceSize::compute(logical_width, logical_height, reported_ratio);
		self.painter.resize(&self.size);
	}

	pub fn clear(&mut self) {
		let (w, h) = (self.width(), self.height());
		self.painter.clear(w, h);
	}
}

/// What drives a surface's logical size.
#[derive(Clone, Debug)]
pub enum SizeSource {
	/// The viewport; refit on debounced window resizes.
	Window,
	/// A containing element's layout box; refit on every observed change.
	Container(Element),
}

impl SizeSource {
	/// Current logical size, or `None` when the source cannot be measured.
	pub fn measure(&self) -> Option<(f64, f64)> {
		match self {
			SizeSource::Window => {
				let window = web_sys::window()?;
				Some((
					window.inner_width().ok()?.as_f64()?,
					window.inner_height().ok()?.as_f64()?,
				))
			}
			SizeSource::Container(element) => {
				let rect = element.get_bounding_client_rect();
				Some((rect.width(), rect.height()))
			}
		}
	}
}

/// Reported device pixel ratio of the current window, 1 when unknown.
pub fn device_pixel_ratio() -> f64 {
	web_sys::window()
		.map(|w| w.device_pixel_ratio())
		.unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
	use super::super::render::recording::{Op, Recorder};
	use super::*;

	#[test]
	fn physical_size_scales_and_floors() {
		let size = SurfaceSize::compute(333.3, 200.0, 1.5);
		assert_eq!(size.pixel_width, 499);
		assert_eq!(size.pixel_height, 300);
		assert_eq!(size.logical_width, 333.3);
		assert_eq!(size.ratio, 1.5);
	}

	#[test]
	fn ratio_below_one_is_raised() {
		let size = SurfaceSize::compute(640.0, 480.0, 0.5);
		assert_eq!(size.ratio, 1.0);
		assert_eq!((size.pixel_width, size.pixel_height), (640, 480));

		let size = SurfaceSize::compute(640.0, 480.0, f64::NAN);
		assert_eq!(size.ratio, 1.0);
	}

	#[test]
	fn zero_or_bogus_dimensions_keep_a_one_pixel_buffer() {
		for (w, h) in [(0.0, 0.0), (-20.0, 10.0), (f64::INFINITY, f64::NAN)] {
			let size = SurfaceSize::compute(w, h, 2.0);
			assert!(size.pixel_width >= 1 && size.pixel_height >= 1, "{size:?}");
			assert!(size.logical_width >= 0.0 && size.logical_height >= 0.0);
		}
	}

	#[test]
	fn physical_matches_floor_of_logical_times_ratio() {
		for &(w, h, r) in &[(1.0, 1.0, 3.0), (1919.7, 1080.2, 1.25), (375.0, 812.0, 2.625)] {
			let size = SurfaceSize::compute(w, h, r);
			assert_eq!(size.pixel_width, ((w * r).floor() as u32).max(1));
			assert_eq!(size.pixel_height, ((h * r).floor() as u32).max(1));
		}
	}

	#[test]
	fn surface_resize_reaches_the_painter() {
		let mut surface = Surface::new(Recorder::default());
		surface.resize(800.0, 600.0, 2.0);
		assert_eq!(
			surface.painter.last(),
			Some(&Op::Resize {
				pixel_width: 1600,
				pixel_height: 1200
			})
		);
		assert_eq!(surface.width(), 800.0);
	}
}
