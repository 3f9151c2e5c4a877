#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Meadow adapters.
//!
//! The viewport pipeline is backend agnostic. Adapters implement
//! [`DrawingSurface`] for their drawing API and hand it to [`render_frame`],
//! which configures the surface for the display density, takes a single
//! snapshot from the simulation engine and draws one glyph per agent.
//! [`RecordingSurface`] captures those calls so a frame can be inspected,
//! serialised or replayed onto another surface.

mod display;
mod glyph;
mod pass;
mod surface;

use anyhow::Result as AnyResult;
use meadow_core::EngineUnavailable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::display::{
    resolve_pixel_ratio, viewport_from_display, DisplayMetrics, FixedDisplay,
};
pub use self::glyph::{GlyphKind, GlyphStrategy, GlyphStyle, SquareGlyph, TriangleGlyph};
pub use self::pass::{map_agent, render_frame, render_world, RenderSummary};
pub use self::surface::{configure_surface, DrawCommand, DrawingSurface, RecordingSurface};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque black, the default glyph fill.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Requested window width in logical pixels.
    pub window_width: f32,
    /// Requested window height in logical pixels.
    pub window_height: f32,
    /// Pixel ratio to assume when the backend cannot query the display.
    pub pixel_ratio: Option<f32>,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        window_title: T,
        clear_color: Color,
        window_width: f32,
        window_height: f32,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            window_width,
            window_height,
            pixel_ratio: None,
        }
    }

    /// Overrides the pixel ratio reported to the render pass.
    #[must_use]
    pub fn with_pixel_ratio(mut self, pixel_ratio: Option<f32>) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }
}

/// Rendering backend capable of presenting a single Meadow frame.
pub trait RenderingBackend {
    /// Opens the backend's display and keeps the frame visible until it is dismissed.
    ///
    /// `render_frame` runs exactly once, after the display exists, and receives
    /// the display metrics observed by the backend. The recording it returns is
    /// what the backend presents; the simulation is not sampled again.
    fn present<F>(self, presentation: Presentation, render_frame: F) -> AnyResult<()>
    where
        F: FnOnce(&dyn DisplayMetrics) -> AnyResult<RecordingSurface> + 'static;
}

/// Errors that abort a render pass.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The world snapshot could not be obtained, so nothing was drawn.
    #[error("render pass aborted: {0}")]
    EngineUnavailable(#[from] EngineUnavailable),
}
