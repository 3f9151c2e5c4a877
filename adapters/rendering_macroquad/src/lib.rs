#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Meadow.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The backend runs the render pass once, into a
//! [`RecordingSurface`](meadow_rendering::RecordingSurface), as soon as the
//! window exists. Every display refresh afterwards replays that recording onto
//! a [`MacroquadSurface`]; the simulation is never sampled a second time.

mod surface;

use anyhow::Result;
use macroquad::input::{is_key_pressed, KeyCode};
use meadow_rendering::{Color, DisplayMetrics, Presentation, RecordingSurface, RenderingBackend};
use std::sync::mpsc;

pub use self::surface::MacroquadSurface;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to close the window.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);

        Self { quit_requested }
    }
}

/// Display metrics for the macroquad window.
///
/// The logical size is the size requested for the window, never a value
/// derived from the framebuffer. Macroquad does not expose the platform pixel
/// density without unsafe access to its graphics context, so the ratio is
/// only known when the caller supplies one.
#[derive(Clone, Copy, Debug, PartialEq)]
struct MacroquadDisplay {
    width: f32,
    height: f32,
    pixel_ratio: Option<f32>,
}

impl MacroquadDisplay {
    fn from_presentation(width: f32, height: f32, pixel_ratio: Option<f32>) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }
}

impl DisplayMetrics for MacroquadDisplay {
    fn logical_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn pixel_ratio(&self) -> Option<f32> {
        self.pixel_ratio
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or redraw as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn present<F>(self, presentation: Presentation, render_frame: F) -> Result<()>
    where
        F: FnOnce(&dyn DisplayMetrics) -> Result<RecordingSurface> + 'static,
    {
        let Self { swap_interval } = self;

        let Presentation {
            window_title,
            clear_color,
            window_width,
            window_height,
            pixel_ratio,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_width.round() as i32,
            window_height: window_height.round() as i32,
            high_dpi: pixel_ratio.is_some(),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (frame_sender, frame_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let display =
                MacroquadDisplay::from_presentation(window_width, window_height, pixel_ratio);
            tracing::debug!(
                screen_width = macroquad::window::screen_width(),
                screen_height = macroquad::window::screen_height(),
                "macroquad window opened"
            );
            let recording = match render_frame(&display) {
                Ok(recording) => recording,
                Err(error) => {
                    let _ = frame_sender.send(Err(error));
                    return;
                }
            };
            let _ = frame_sender.send(Ok(()));

            tracing::info!(
                commands = recording.commands().len(),
                glyphs = recording.draw_call_count(),
                "presenting recorded frame"
            );

            let background = to_macroquad_color(clear_color);
            let mut surface = MacroquadSurface::new();

            loop {
                if KeyboardShortcuts::poll().quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);
                recording.replay(&mut surface);
                macroquad::window::next_frame().await;
            }
        });

        frame_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reports_requested_window_size() {
        let display = MacroquadDisplay::from_presentation(960.0, 720.0, None);

        assert_eq!(display.logical_size(), (960.0, 720.0));
        assert!(display.pixel_ratio().is_none());
    }

    #[test]
    fn pixel_ratio_override_does_not_shrink_the_logical_viewport() {
        let display = MacroquadDisplay::from_presentation(960.0, 960.0, Some(2.0));
        let viewport =
            meadow_rendering::viewport_from_display(&display).expect("valid display");

        assert_eq!(viewport.logical_width(), 960.0);
        assert_eq!(viewport.logical_height(), 960.0);
        assert_eq!(viewport.physical_width(), 1920);
    }

    #[test]
    fn to_macroquad_color_preserves_channels() {
        let color = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));

        assert_eq!(color, macroquad::color::Color::new(0.1, 0.2, 0.3, 0.4));
    }

    #[test]
    fn vsync_toggles_swap_interval() {
        assert_eq!(MacroquadBackend::new().with_vsync(true).swap_interval, Some(1));
        assert_eq!(MacroquadBackend::new().with_vsync(false).swap_interval, Some(0));
        assert_eq!(MacroquadBackend::new().swap_interval, None);
    }
}
