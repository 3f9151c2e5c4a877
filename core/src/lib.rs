#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Meadow viewport.
//!
//! This crate defines the data that crosses the boundary between the
//! simulation engine and the rendering adapters. Engines expose their state
//! through [`SnapshotSource`], which hands out an owned [`WorldSnapshot`] of
//! [`Agent`] positions. Renderers combine that snapshot with a
//! [`ViewportConfig`] and a [`GlyphSpec`] to decide where and how large each
//! agent is drawn.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fraction of the viewport width used for glyphs when nothing else is configured.
pub const DEFAULT_SIZE_FRACTION: f32 = 0.01;

/// Pixel ratio assumed when the display cannot report its density.
pub const FALLBACK_PIXEL_RATIO: f32 = 1.0;

/// Single simulated entity as seen by renderers.
///
/// Coordinates are normalised to the world extent, so `0.0..=1.0` covers the
/// visible area on each axis. Values outside that range are legal and simply
/// fall outside the surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Horizontal position relative to the world width.
    pub x: f32,
    /// Vertical position relative to the world height.
    pub y: f32,
}

impl Agent {
    /// Creates a new agent record from normalised coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Point-in-time copy of the agent population, in engine iteration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    agents: Vec<Agent>,
}

impl WorldSnapshot {
    /// Creates a snapshot from agents listed in iteration order.
    #[must_use]
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    /// Agents captured by the snapshot.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Number of agents captured by the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Reports whether the snapshot holds no agents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl FromIterator<Agent> for WorldSnapshot {
    fn from_iter<T: IntoIterator<Item = Agent>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a WorldSnapshot {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

/// Raised when a snapshot is requested from an engine that does not exist.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("simulation engine is unavailable")]
pub struct EngineUnavailable;

/// Read-only access to the current agent population of a simulation engine.
///
/// Every call produces a fresh copy; callers must not assume two calls agree.
pub trait SnapshotSource {
    /// Captures the current agent population.
    fn world_snapshot(&self) -> Result<WorldSnapshot, EngineUnavailable>;
}

impl<S> SnapshotSource for &S
where
    S: SnapshotSource + ?Sized,
{
    fn world_snapshot(&self) -> Result<WorldSnapshot, EngineUnavailable> {
        (**self).world_snapshot()
    }
}

impl<S> SnapshotSource for Option<S>
where
    S: SnapshotSource,
{
    fn world_snapshot(&self) -> Result<WorldSnapshot, EngineUnavailable> {
        self.as_ref()
            .ok_or(EngineUnavailable)
            .and_then(SnapshotSource::world_snapshot)
    }
}

/// Logical viewport dimensions together with the display pixel density.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ViewportConfig {
    logical_width: f32,
    logical_height: f32,
    pixel_ratio: f32,
}

impl ViewportConfig {
    /// Creates a viewport description.
    ///
    /// Returns an error when a dimension is negative or not finite, or when
    /// the pixel ratio is below one.
    pub fn new(
        logical_width: f32,
        logical_height: f32,
        pixel_ratio: f32,
    ) -> Result<Self, ConfigError> {
        if !is_valid_dimension(logical_width) || !is_valid_dimension(logical_height) {
            return Err(ConfigError::InvalidDimensions {
                width: logical_width,
                height: logical_height,
            });
        }

        if !pixel_ratio.is_finite() || pixel_ratio < 1.0 {
            return Err(ConfigError::InvalidPixelRatio { pixel_ratio });
        }

        Ok(Self {
            logical_width,
            logical_height,
            pixel_ratio,
        })
    }

    /// Width of the viewport in logical pixels.
    #[must_use]
    pub const fn logical_width(&self) -> f32 {
        self.logical_width
    }

    /// Height of the viewport in logical pixels.
    #[must_use]
    pub const fn logical_height(&self) -> f32 {
        self.logical_height
    }

    /// Number of physical pixels per logical pixel along each axis.
    #[must_use]
    pub const fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Width of the backing buffer in whole physical pixels.
    #[must_use]
    pub fn physical_width(&self) -> u32 {
        (self.logical_width * self.pixel_ratio) as u32
    }

    /// Height of the backing buffer in whole physical pixels.
    #[must_use]
    pub fn physical_height(&self) -> u32 {
        (self.logical_height * self.pixel_ratio) as u32
    }
}

fn is_valid_dimension(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Glyph size expressed relative to the viewport width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GlyphSpec {
    size_fraction: f32,
}

impl GlyphSpec {
    /// Creates a glyph specification.
    ///
    /// Returns an error unless `size_fraction` is finite and positive.
    pub fn new(size_fraction: f32) -> Result<Self, ConfigError> {
        if !size_fraction.is_finite() || size_fraction <= 0.0 {
            return Err(ConfigError::InvalidSizeFraction { size_fraction });
        }

        Ok(Self { size_fraction })
    }

    /// Fraction of the viewport width spanned by a glyph's size unit.
    #[must_use]
    pub const fn size_fraction(&self) -> f32 {
        self.size_fraction
    }

    /// Glyph size in logical pixels for the provided viewport.
    #[must_use]
    pub fn size_for(&self, viewport: &ViewportConfig) -> f32 {
        self.size_fraction * viewport.logical_width()
    }
}

impl Default for GlyphSpec {
    fn default() -> Self {
        Self {
            size_fraction: DEFAULT_SIZE_FRACTION,
        }
    }
}

/// Errors raised when validating viewport or glyph configuration.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Pixel ratio must be finite and at least one.
    #[error("pixel ratio must be a finite value of at least 1 (received {pixel_ratio})")]
    InvalidPixelRatio {
        /// Ratio that failed validation.
        pixel_ratio: f32,
    },
    /// Viewport dimensions must be finite and non-negative.
    #[error("viewport dimensions must be finite and non-negative (received {width}x{height})")]
    InvalidDimensions {
        /// Width that was provided.
        width: f32,
        /// Height that was provided.
        height: f32,
    },
    /// Glyph size fraction must be finite and positive.
    #[error("glyph size fraction must be positive (received {size_fraction})")]
    InvalidSizeFraction {
        /// Fraction that failed validation.
        size_fraction: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Vec<Agent>);

    impl SnapshotSource for FixedSource {
        fn world_snapshot(&self) -> Result<WorldSnapshot, EngineUnavailable> {
            Ok(WorldSnapshot::new(self.0.clone()))
        }
    }

    #[test]
    fn viewport_reports_physical_buffer_dimensions() {
        let viewport = ViewportConfig::new(1000.0, 500.0, 2.0).expect("valid viewport");

        assert_eq!(viewport.physical_width(), 2000);
        assert_eq!(viewport.physical_height(), 1000);
    }

    #[test]
    fn physical_dimensions_truncate_fractional_pixels() {
        let viewport = ViewportConfig::new(333.0, 101.0, 1.5).expect("valid viewport");

        assert_eq!(viewport.physical_width(), 499);
        assert_eq!(viewport.physical_height(), 151);
    }

    #[test]
    fn viewport_rejects_pixel_ratio_below_one() {
        let error = ViewportConfig::new(800.0, 600.0, 0.5).expect_err("ratio below one");

        assert!(matches!(error, ConfigError::InvalidPixelRatio { .. }));
    }

    #[test]
    fn viewport_rejects_non_finite_dimensions() {
        assert!(ViewportConfig::new(f32::NAN, 600.0, 1.0).is_err());
        assert!(ViewportConfig::new(800.0, f32::INFINITY, 1.0).is_err());
        assert!(ViewportConfig::new(-1.0, 600.0, 1.0).is_err());
    }

    #[test]
    fn glyph_spec_rejects_non_positive_fractions() {
        assert!(GlyphSpec::new(0.0).is_err());
        assert!(GlyphSpec::new(-0.01).is_err());
        assert!(GlyphSpec::new(f32::NAN).is_err());
    }

    #[test]
    fn glyph_size_follows_viewport_width() {
        let spec = GlyphSpec::default();
        let viewport = ViewportConfig::new(1000.0, 10.0, 1.0).expect("valid viewport");

        assert!((spec.size_for(&viewport) - 10.0).abs() <= f32::EPSILON);
    }

    #[test]
    fn missing_engine_reports_unavailable() {
        let engine: Option<FixedSource> = None;

        assert_eq!(engine.world_snapshot(), Err(EngineUnavailable));
    }

    #[test]
    fn present_engine_forwards_snapshot() {
        let engine = Some(FixedSource(vec![Agent::new(0.25, 0.75)]));
        let snapshot = engine.world_snapshot().expect("engine is present");

        assert_eq!(snapshot.agents(), &[Agent::new(0.25, 0.75)]);
    }
}
