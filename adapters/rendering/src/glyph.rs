use glam::Vec2;
use meadow_core::GlyphSpec;
use serde::{Deserialize, Serialize};

use crate::{Color, DrawingSurface};

/// Shape drawn to represent a single agent.
pub trait GlyphStrategy {
    /// Vertices of the glyph anchored at `anchor`, in drawing order.
    fn outline(&self, anchor: Vec2, size: f32) -> Vec<Vec2>;

    /// Traces the outline as a closed path and fills it without stroking.
    fn draw<S>(&self, surface: &mut S, anchor: Vec2, size: f32)
    where
        S: DrawingSurface + ?Sized,
    {
        let outline = self.outline(anchor, size);
        let Some((first, rest)) = outline.split_first() else {
            return;
        };

        surface.begin_path();
        surface.move_to(first.x, first.y);
        for vertex in rest {
            surface.line_to(vertex.x, vertex.y);
        }
        surface.close_path();
        surface.fill();
    }
}

/// Axis-aligned square of side `2 * size` with its top-left corner on the anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SquareGlyph;

impl GlyphStrategy for SquareGlyph {
    fn outline(&self, anchor: Vec2, size: f32) -> Vec<Vec2> {
        let side = 2.0 * size;
        vec![
            anchor,
            anchor + Vec2::new(side, 0.0),
            anchor + Vec2::new(side, side),
            anchor + Vec2::new(0.0, side),
        ]
    }
}

/// Isoceles triangle with its apex on the anchor and its base `size` below.
///
/// Always points up; agent headings are not consulted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriangleGlyph;

impl GlyphStrategy for TriangleGlyph {
    fn outline(&self, anchor: Vec2, size: f32) -> Vec<Vec2> {
        vec![
            anchor,
            anchor + Vec2::new(size, size),
            anchor + Vec2::new(-size, size),
        ]
    }
}

/// Glyph strategy selected by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphKind {
    /// Draws [`SquareGlyph`].
    Square,
    /// Draws [`TriangleGlyph`].
    #[default]
    Triangle,
}

impl GlyphStrategy for GlyphKind {
    fn outline(&self, anchor: Vec2, size: f32) -> Vec<Vec2> {
        match self {
            Self::Square => SquareGlyph.outline(anchor, size),
            Self::Triangle => TriangleGlyph.outline(anchor, size),
        }
    }
}

/// Everything the render pass needs to know about how agents look.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphStyle {
    /// Size of each glyph relative to the viewport width.
    pub spec: GlyphSpec,
    /// Shape drawn for each agent.
    pub kind: GlyphKind,
    /// Fill color shared by every glyph.
    pub fill: Color,
}

impl GlyphStyle {
    /// Creates a style with the provided size and shape, filled black.
    #[must_use]
    pub fn new(spec: GlyphSpec, kind: GlyphKind) -> Self {
        Self {
            spec,
            kind,
            fill: Color::BLACK,
        }
    }

    /// Overrides the fill color.
    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }
}
