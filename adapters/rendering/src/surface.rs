use meadow_core::ViewportConfig;
use serde::Serialize;

use crate::Color;

/// Immediate-mode 2D drawing context targeted by the render pass.
///
/// Coordinates passed to path operations are multiplied by the current scale
/// transform. Resizing the backing buffer resets that transform to identity,
/// matching how an HTML canvas discards its context state on resize.
pub trait DrawingSurface {
    /// Resizes the physical backing buffer and resets the transform.
    fn set_buffer_size(&mut self, width: u32, height: u32);

    /// Sets the size at which the surface is displayed, in logical pixels.
    fn set_display_size(&mut self, width: f32, height: f32);

    /// Multiplies the current transform by a uniform scale.
    fn scale(&mut self, factor: f32);

    /// Sets the color used by subsequent fills.
    fn set_fill_color(&mut self, color: Color);

    /// Discards the current path and starts a new one.
    fn begin_path(&mut self);

    /// Starts a new subpath at the provided point.
    fn move_to(&mut self, x: f32, y: f32);

    /// Extends the current subpath with a straight segment.
    fn line_to(&mut self, x: f32, y: f32);

    /// Closes the current subpath back to its starting point.
    fn close_path(&mut self);

    /// Fills the current path with the fill color.
    fn fill(&mut self);
}

/// Single call recorded by a [`RecordingSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Physical buffer resize.
    SetBufferSize {
        /// Buffer width in physical pixels.
        width: u32,
        /// Buffer height in physical pixels.
        height: u32,
    },
    /// Displayed size change.
    SetDisplaySize {
        /// Displayed width in logical pixels.
        width: f32,
        /// Displayed height in logical pixels.
        height: f32,
    },
    /// Uniform scale applied to the transform.
    Scale {
        /// Scale factor.
        factor: f32,
    },
    /// Fill color change.
    SetFillColor {
        /// Color used by later fills.
        color: Color,
    },
    /// Start of a new path.
    BeginPath,
    /// Start of a new subpath.
    MoveTo {
        /// Horizontal coordinate in the current transform.
        x: f32,
        /// Vertical coordinate in the current transform.
        y: f32,
    },
    /// Straight segment appended to the current subpath.
    LineTo {
        /// Horizontal coordinate in the current transform.
        x: f32,
        /// Vertical coordinate in the current transform.
        y: f32,
    },
    /// Subpath closed back to its start.
    ClosePath,
    /// Current path filled.
    Fill,
}

/// Drawing surface that records every call made against it.
///
/// Tracks the resulting buffer size, display size and transform so tests can
/// assert on the final surface state as well as on the call sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    buffer_size: Option<(u32, u32)>,
    display_size: Option<(f32, f32)>,
    transform_scale: f32,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            buffer_size: None,
            display_size: None,
            transform_scale: 1.0,
        }
    }
}

impl RecordingSurface {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far, in issue order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of fill operations recorded.
    #[must_use]
    pub fn draw_call_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Fill))
            .count()
    }

    /// Most recent physical buffer size, if one was set.
    #[must_use]
    pub fn buffer_size(&self) -> Option<(u32, u32)> {
        self.buffer_size
    }

    /// Most recent displayed size, if one was set.
    #[must_use]
    pub fn display_size(&self) -> Option<(f32, f32)> {
        self.display_size
    }

    /// Scale factor of the current transform.
    #[must_use]
    pub fn transform_scale(&self) -> f32 {
        self.transform_scale
    }

    /// Issues every recorded call against `target`, in order.
    pub fn replay<S>(&self, target: &mut S)
    where
        S: DrawingSurface + ?Sized,
    {
        for command in &self.commands {
            match *command {
                DrawCommand::SetBufferSize { width, height } => {
                    target.set_buffer_size(width, height)
                }
                DrawCommand::SetDisplaySize { width, height } => {
                    target.set_display_size(width, height)
                }
                DrawCommand::Scale { factor } => target.scale(factor),
                DrawCommand::SetFillColor { color } => target.set_fill_color(color),
                DrawCommand::BeginPath => target.begin_path(),
                DrawCommand::MoveTo { x, y } => target.move_to(x, y),
                DrawCommand::LineTo { x, y } => target.line_to(x, y),
                DrawCommand::ClosePath => target.close_path(),
                DrawCommand::Fill => target.fill(),
            }
        }
    }
}

impl DrawingSurface for RecordingSurface {
    fn set_buffer_size(&mut self, width: u32, height: u32) {
        self.buffer_size = Some((width, height));
        self.transform_scale = 1.0;
        self.commands
            .push(DrawCommand::SetBufferSize { width, height });
    }

    fn set_display_size(&mut self, width: f32, height: f32) {
        self.display_size = Some((width, height));
        self.commands
            .push(DrawCommand::SetDisplaySize { width, height });
    }

    fn scale(&mut self, factor: f32) {
        self.transform_scale *= factor;
        self.commands.push(DrawCommand::Scale { factor });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetFillColor { color });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }
}

/// Prepares `surface` so that drawing calls are issued in logical pixels.
///
/// The backing buffer is sized to the physical resolution, the displayed size
/// to the logical resolution, and the transform is scaled by the pixel ratio.
pub fn configure_surface<S>(surface: &mut S, viewport: &ViewportConfig)
where
    S: DrawingSurface + ?Sized,
{
    let physical_width = viewport.physical_width();
    let physical_height = viewport.physical_height();

    surface.set_buffer_size(physical_width, physical_height);
    surface.set_display_size(viewport.logical_width(), viewport.logical_height());
    surface.scale(viewport.pixel_ratio());

    tracing::debug!(
        physical_width,
        physical_height,
        pixel_ratio = viewport.pixel_ratio(),
        "configured drawing surface"
    );
}
