//! [`DrawingSurface`] implementation backed by macroquad's immediate-mode shapes.

use glam::Vec2;
use macroquad::math::Vec2 as MacroquadVec2;
use meadow_rendering::{Color, DrawingSurface};

use crate::to_macroquad_color;

/// Path and transform bookkeeping independent of any graphics context.
///
/// Points are stored already multiplied by the scale that was current when
/// they were added, i.e. in window pixels.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PathState {
    scale: f32,
    subpaths: Vec<Vec<Vec2>>,
}

impl Default for PathState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            subpaths: Vec::new(),
        }
    }
}

impl PathState {
    pub(crate) fn reset_transform(&mut self) {
        self.scale = 1.0;
    }

    pub(crate) fn scale(&mut self, factor: f32) {
        self.scale *= factor;
    }

    pub(crate) fn begin(&mut self) {
        self.subpaths.clear();
    }

    pub(crate) fn move_to(&mut self, x: f32, y: f32) {
        self.subpaths.push(vec![Vec2::new(x, y) * self.scale]);
    }

    pub(crate) fn line_to(&mut self, x: f32, y: f32) {
        let point = Vec2::new(x, y) * self.scale;
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(point),
            None => self.subpaths.push(vec![point]),
        }
    }

    pub(crate) fn close(&mut self) {
        let start = self
            .subpaths
            .last()
            .and_then(|subpath| subpath.first())
            .copied();
        if let Some(start) = start {
            self.subpaths.push(vec![start]);
        }
    }

    /// Triangles covering every subpath, assuming each subpath is convex.
    pub(crate) fn fill_triangles(&self) -> Vec<[Vec2; 3]> {
        self.subpaths
            .iter()
            .flat_map(|subpath| fan_triangles(subpath))
            .collect()
    }
}

/// Splits a convex polygon into triangles sharing its first vertex.
pub(crate) fn fan_triangles(points: &[Vec2]) -> Vec<[Vec2; 3]> {
    let Some((&pivot, rest)) = points.split_first() else {
        return Vec::new();
    };

    rest.windows(2)
        .map(|pair| [pivot, pair[0], pair[1]])
        .collect()
}

/// Drawing surface that paints directly into the current macroquad frame.
///
/// The window is never resized from here. Path points arrive in buffer pixels
/// and are stretched onto whatever framebuffer macroquad actually provides.
#[derive(Debug)]
pub struct MacroquadSurface {
    path: PathState,
    fill: macroquad::color::Color,
    buffer_size: Option<(u32, u32)>,
}

impl Default for MacroquadSurface {
    fn default() -> Self {
        Self {
            path: PathState::default(),
            fill: to_macroquad_color(Color::BLACK),
            buffer_size: None,
        }
    }
}

impl MacroquadSurface {
    /// Creates a surface with an identity transform and a black fill.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Physical buffer size most recently requested by the render pass.
    #[must_use]
    pub fn buffer_size(&self) -> Option<(u32, u32)> {
        self.buffer_size
    }

    /// Per-axis factor mapping buffer pixels onto a framebuffer of `screen` pixels.
    fn buffer_fit(&self, screen: Vec2) -> Vec2 {
        match self.buffer_size {
            Some((width, height)) if width > 0 && height > 0 => {
                screen / Vec2::new(width as f32, height as f32)
            }
            _ => Vec2::ONE,
        }
    }
}

impl DrawingSurface for MacroquadSurface {
    fn set_buffer_size(&mut self, width: u32, height: u32) {
        if self.buffer_size != Some((width, height)) {
            tracing::debug!(width, height, "macroquad buffer size requested");
        }
        self.buffer_size = Some((width, height));
        self.path.reset_transform();
    }

    fn set_display_size(&mut self, _width: f32, _height: f32) {
        // The window keeps the size it was opened with.
    }

    fn scale(&mut self, factor: f32) {
        self.path.scale(factor);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = to_macroquad_color(color);
    }

    fn begin_path(&mut self) {
        self.path.begin();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn fill(&mut self) {
        let fit = self.buffer_fit(Vec2::new(
            macroquad::window::screen_width(),
            macroquad::window::screen_height(),
        ));
        for [a, b, c] in self.path.fill_triangles() {
            let [a, b, c] = [a * fit, b * fit, c * fit];
            macroquad::shapes::draw_triangle(
                MacroquadVec2::new(a.x, a.y),
                MacroquadVec2::new(b.x, b.y),
                MacroquadVec2::new(c.x, c.y),
                self.fill,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_triangles_cover_a_square() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];

        let triangles = fan_triangles(&square);

        assert_eq!(
            triangles,
            vec![
                [square[0], square[1], square[2]],
                [square[0], square[2], square[3]],
            ]
        );
    }

    #[test]
    fn fan_triangles_ignore_degenerate_paths() {
        assert!(fan_triangles(&[]).is_empty());
        assert!(fan_triangles(&[Vec2::ZERO]).is_empty());
        assert!(fan_triangles(&[Vec2::ZERO, Vec2::ONE]).is_empty());
    }

    #[test]
    fn path_points_are_scaled_by_the_current_transform() {
        let mut path = PathState::default();
        path.scale(2.0);
        path.begin();
        path.move_to(500.0, 100.0);
        path.line_to(510.0, 110.0);
        path.line_to(490.0, 110.0);
        path.close();

        assert_eq!(
            path.fill_triangles(),
            vec![[
                Vec2::new(1000.0, 200.0),
                Vec2::new(1020.0, 220.0),
                Vec2::new(980.0, 220.0),
            ]]
        );
    }

    #[test]
    fn resetting_the_transform_restores_identity() {
        let mut path = PathState::default();
        path.scale(3.0);
        path.reset_transform();
        path.begin();
        path.move_to(1.0, 1.0);
        path.line_to(2.0, 1.0);
        path.line_to(1.0, 2.0);

        assert_eq!(
            path.fill_triangles(),
            vec![[Vec2::new(1.0, 1.0), Vec2::new(2.0, 1.0), Vec2::new(1.0, 2.0)]]
        );
    }

    #[test]
    fn begin_discards_previous_subpaths() {
        let mut path = PathState::default();
        path.move_to(0.0, 0.0);
        path.line_to(1.0, 0.0);
        path.line_to(0.0, 1.0);
        path.begin();

        assert!(path.fill_triangles().is_empty());
    }

    #[test]
    fn buffer_resize_is_remembered_and_resets_the_transform() {
        let mut surface = MacroquadSurface::new();
        surface.scale(3.0);
        surface.set_buffer_size(1920, 960);
        surface.set_display_size(960.0, 480.0);

        assert_eq!(surface.buffer_size(), Some((1920, 960)));
        assert_eq!(surface.path, PathState::default());
    }

    #[test]
    fn buffer_is_stretched_onto_a_smaller_framebuffer() {
        let mut surface = MacroquadSurface::new();
        surface.set_buffer_size(1920, 1920);

        assert_eq!(
            surface.buffer_fit(Vec2::new(960.0, 960.0)),
            Vec2::new(0.5, 0.5)
        );
    }

    #[test]
    fn buffer_fit_is_identity_until_a_buffer_is_configured() {
        let mut surface = MacroquadSurface::new();

        assert_eq!(surface.buffer_fit(Vec2::new(640.0, 480.0)), Vec2::ONE);

        surface.set_buffer_size(0, 0);
        assert_eq!(surface.buffer_fit(Vec2::new(640.0, 480.0)), Vec2::ONE);
    }
}
