//! Storm backdrop effects.
//!
//! Two independent engines drawing on HTML canvases:
//! - [`LightningGenerator`]: jagged strikes on a randomized schedule, with an
//!   afterglow produced by fading instead of clearing
//! - [`FireSimulator`]: a bounded population of additive flame particles
//!
//! A [`Stage`] binds them to their surfaces, plays the fire intro once via a
//! [`Sequencer`] and then hands off to lightning. [`EffectsLayer`] mounts the
//! whole thing in a Leptos view.
//!
//! # Example
//!
//! ```ignore
//! use storm_fx::components::effects::{EffectsConfig, EffectsLayer};
//!
//! view! { <EffectsLayer config=EffectsConfig::default() fire=true /> }
//! ```

mod component;
pub mod config;
mod fire;
mod lightning;
mod render;
mod sequencer;
mod stage;
pub mod surface;
pub mod theme;

pub use component::{Driver, EffectsLayer};
pub use config::{EffectsConfig, FireConfig, LightningConfig, SequenceConfig, Span};
pub use fire::{FireSimulator, Particle};
pub use lightning::{LightningGenerator, Strike};
pub use render::{CanvasPainter, Painter};
pub use sequencer::{Cue, Sequencer};
pub use stage::{Bound, Stage};
pub use surface::{SizeSource, Surface, SurfaceSize};
pub use theme::Theme;
