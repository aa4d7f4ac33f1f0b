//! Canvas drawing for the effects.
//!
//! The engines only talk to a [`Painter`], so their per-tick logic runs the
//! same against a real `CanvasRenderingContext2d` and against the recording
//! painter used in tests. All coordinates are logical (CSS) pixels.

use std::f64::consts::PI;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::surface::SurfaceSize;
use super::theme::{Color, Hsla, StrokeStyle};
use crate::error::{FxError, FxResult};

/// Drawing operations the engines need from a surface.
pub trait Painter {
	/// Paint `color` over the whole surface with normal (source-over) blending.
	fn fade(&mut self, width: f64, height: f64, color: Color);

	/// Erase the whole surface.
	fn clear(&mut self, width: f64, height: f64);

	/// Stroke a connected line through `points`.
	fn stroke_path(&mut self, points: &[(f64, f64)], style: StrokeStyle);

	/// Fill a radial-gradient disc with additive blending, then restore
	/// normal blending.
	fn glow(&mut self, x: f64, y: f64, radius: f64, stops: &[(f32, Hsla)]);

	/// Match the physical buffer, displayed size and transform to `size`.
	fn resize(&mut self, size: &SurfaceSize);
}

/// [`Painter`] over an HTML canvas element.
pub struct CanvasPainter {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
	/// Bind to `canvas`'s 2D context.
	pub fn attach(canvas: HtmlCanvasElement) -> FxResult<Self> {
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or(FxError::ContextUnavailable)?
			.dyn_into()
			.map_err(|_| FxError::ContextUnavailable)?;
		Ok(Self { canvas, ctx })
	}

	pub fn canvas(&self) -> &HtmlCanvasElement {
		&self.canvas
	}
}

impl Painter for CanvasPainter {
	fn fade(&mut self, width: f64, height: f64, color: Color) {
		let _ = self.ctx.set_global_composite_operation("source-over");
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill_rect(0.0, 0.0, width, height);
	}

	fn clear(&mut self, width: f64, height: f64) {
		self.ctx.clear_rect(0.0, 0.0, width, height);
	}

	fn stroke_path(&mut self, points: &[(f64, f64)], style: StrokeStyle) {
		let Some((&(x0, y0), rest)) = points.split_first() else {
			return;
		};
		if rest.is_empty() {
			return;
		}

		self.ctx.set_stroke_style_str(&style.color.to_css());
		self.ctx.set_line_width(style.width);
		self.ctx.set_line_join("round");
		self.ctx.set_line_cap("round");

		self.ctx.begin_path();
		self.ctx.move_to(x0, y0);
		for &(x, y) in rest {
			self.ctx.line_to(x, y);
		}
		self.ctx.stroke();
	}

	fn glow(&mut self, x: f64, y: f64, radius: f64, stops: &[(f32, Hsla)]) {
		if radius <= 0.0 {
			return;
		}
		let gradient = match self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius) {
			Ok(g) => g,
			Err(e) => {
				debug!("storm-fx: radial gradient rejected: {:?}", e);
				return;
			}
		};
		for (offset, color) in stops {
			let _ = gradient.add_color_stop(*offset, &color.to_css());
		}

		let _ = self.ctx.set_global_composite_operation("lighter");
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, PI * 2.0);
		self.ctx.fill();
		let _ = self.ctx.set_global_composite_operation("source-over");
	}

	fn resize(&mut self, size: &SurfaceSize) {
		self.canvas.set_width(size.pixel_width);
		self.canvas.set_height(size.pixel_height);

		let style = self.canvas.style();
		let _ = style.set_property("width", &format!("{}px", size.logical_width));
		let _ = style.set_property("height", &format!("{}px", size.logical_height));

		// Resetting the buffer resets the transform; reinstall it absolutely.
		let _ = self
			.ctx
			.set_transform(size.ratio, 0.0, 0.0, size.ratio, 0.0, 0.0);
	}
}

#[cfg(test)]
pub(crate) mod recording {
	//! Painter that records operations instead of drawing.

	use super::*;

	#[derive(Clone, Debug, PartialEq)]
	pub enum Op {
		Fade { alpha: f64 },
		Clear,
		Stroke { points: usize, width: f64 },
		Glow { x: f64, y: f64, radius: f64, center_alpha: f64 },
		Resize { pixel_width: u32, pixel_height: u32 },
	}

	#[derive(Debug, Default)]
	pub struct Recorder {
		pub ops: Vec<Op>,
	}

	impl Recorder {
		pub fn take(&mut self) -> Vec<Op> {
			std::mem::take(&mut self.ops)
		}

		pub fn last(&self) -> Option<&Op> {
			self.ops.last()
		}
	}

	impl Painter for Recorder {
		fn fade(&mut self, _width: f64, _height: f64, color: Color) {
			self.ops.push(Op::Fade { alpha: color.a });
		}

		fn clear(&mut self, _width: f64, _height: f64) {
			self.ops.push(Op::Clear);
		}

		fn stroke_path(&mut self, points: &[(f64, f64)], style: StrokeStyle) {
			self.ops.push(Op::Stroke {
				points: points.len(),
				width: style.width,
			});
		}

		fn glow(&mut self, x: f64, y: f64, radius: f64, stops: &[(f32, Hsla)]) {
			self.ops.push(Op::Glow {
				x,
				y,
				radius,
				center_alpha: stops.first().map(|(_, c)| c.a).unwrap_or(0.0),
			});
		}

		fn resize(&mut self, size: &SurfaceSize) {
			self.ops.push(Op::Resize {
				pixel_width: size.pixel_width,
				pixel_height: size.pixel_height,
			});
		}
	}
}
