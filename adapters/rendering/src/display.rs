use meadow_core::{ConfigError, ViewportConfig, FALLBACK_PIXEL_RATIO};

/// Host display properties read once at startup.
pub trait DisplayMetrics {
    /// Width and height of the viewport in logical pixels.
    fn logical_size(&self) -> (f32, f32);

    /// Physical pixels per logical pixel, when the host can report it.
    fn pixel_ratio(&self) -> Option<f32>;
}

/// Display with metrics fixed up front, used when no window is opened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedDisplay {
    width: f32,
    height: f32,
    pixel_ratio: Option<f32>,
}

impl FixedDisplay {
    /// Creates a display of the provided logical size.
    #[must_use]
    pub const fn new(width: f32, height: f32, pixel_ratio: Option<f32>) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }
}

impl DisplayMetrics for FixedDisplay {
    fn logical_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn pixel_ratio(&self) -> Option<f32> {
        self.pixel_ratio
    }
}

/// Turns a reported pixel ratio into one that satisfies the viewport invariant.
///
/// Unknown or unusable ratios fall back to one; ratios between zero and one
/// are raised to one.
#[must_use]
pub fn resolve_pixel_ratio(reported: Option<f32>) -> f32 {
    match reported {
        Some(ratio) if ratio.is_finite() && ratio >= 1.0 => ratio,
        Some(ratio) if ratio.is_finite() && ratio > 0.0 => {
            tracing::warn!(
                reported = ratio,
                "display pixel ratio below 1; rendering at 1:1"
            );
            FALLBACK_PIXEL_RATIO
        }
        Some(ratio) => {
            tracing::debug!(
                reported = ratio,
                "display pixel ratio unusable; using fallback"
            );
            FALLBACK_PIXEL_RATIO
        }
        None => {
            tracing::debug!("display pixel ratio unavailable; using fallback");
            FALLBACK_PIXEL_RATIO
        }
    }
}

/// Derives the viewport from the host display.
///
/// Returns an error only when the reported logical size is unusable; a missing
/// pixel ratio is recovered with [`resolve_pixel_ratio`].
pub fn viewport_from_display(display: &dyn DisplayMetrics) -> Result<ViewportConfig, ConfigError> {
    let (width, height) = display.logical_size();
    let pixel_ratio = resolve_pixel_ratio(display.pixel_ratio());
    ViewportConfig::new(width, height, pixel_ratio)
}
