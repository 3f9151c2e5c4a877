use glam::Vec2;
use meadow_core::{Agent, SnapshotSource, ViewportConfig};

use crate::{configure_surface, DrawingSurface, GlyphStrategy, GlyphStyle, RenderError};

/// Outcome of a completed render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderSummary {
    glyphs: usize,
}

impl RenderSummary {
    /// Number of glyphs issued, including ones that land outside the surface.
    #[must_use]
    pub const fn glyphs(&self) -> usize {
        self.glyphs
    }
}

/// Maps a normalised agent position onto logical viewport pixels.
///
/// Positions are not clamped; agents outside the unit square land outside
/// the visible surface.
#[must_use]
pub fn map_agent(agent: &Agent, viewport: &ViewportConfig) -> Vec2 {
    Vec2::new(
        agent.x * viewport.logical_width(),
        agent.y * viewport.logical_height(),
    )
}

/// Draws one glyph per agent of a fresh snapshot taken from `engine`.
///
/// The snapshot is requested exactly once. When it cannot be obtained the
/// pass aborts before touching the surface.
pub fn render_world<S, E>(
    surface: &mut S,
    engine: &E,
    viewport: &ViewportConfig,
    style: &GlyphStyle,
) -> Result<RenderSummary, RenderError>
where
    S: DrawingSurface + ?Sized,
    E: SnapshotSource + ?Sized,
{
    let snapshot = engine.world_snapshot()?;
    if snapshot.is_empty() {
        tracing::debug!("world snapshot is empty; nothing to draw");
        return Ok(RenderSummary::default());
    }

    let size = style.spec.size_for(viewport);
    surface.set_fill_color(style.fill);

    for agent in &snapshot {
        let anchor = map_agent(agent, viewport);
        style.kind.draw(&mut *surface, anchor, size);
    }

    let summary = RenderSummary {
        glyphs: snapshot.len(),
    };
    tracing::debug!(
        glyphs = summary.glyphs,
        glyph = ?style.kind,
        size,
        "rendered world snapshot"
    );
    Ok(summary)
}

/// Configures `surface` for `viewport` and renders a snapshot of `engine` onto it.
pub fn render_frame<S, E>(
    surface: &mut S,
    engine: &E,
    viewport: &ViewportConfig,
    style: &GlyphStyle,
) -> Result<RenderSummary, RenderError>
where
    S: DrawingSurface + ?Sized,
    E: SnapshotSource + ?Sized,
{
    configure_surface(surface, viewport);
    render_world(surface, engine, viewport, style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meadow_core::{EngineUnavailable, GlyphSpec, WorldSnapshot};
    use std::cell::Cell;

    use crate::{GlyphKind, RecordingSurface};

    struct CountingSource {
        agents: Vec<Agent>,
        calls: Cell<usize>,
    }

    impl SnapshotSource for CountingSource {
        fn world_snapshot(&self) -> Result<WorldSnapshot, EngineUnavailable> {
            self.calls.set(self.calls.get() + 1);
            Ok(WorldSnapshot::new(self.agents.clone()))
        }
    }

    #[test]
    fn map_agent_scales_by_viewport_dimensions() {
        let viewport = ViewportConfig::new(1000.0, 500.0, 2.0).expect("valid viewport");

        assert_eq!(
            map_agent(&Agent::new(0.5, 0.2), &viewport),
            Vec2::new(500.0, 100.0)
        );
    }

    #[test]
    fn map_agent_does_not_clamp_out_of_range_positions() {
        let viewport = ViewportConfig::new(100.0, 100.0, 1.0).expect("valid viewport");

        assert_eq!(
            map_agent(&Agent::new(-0.5, 1.5), &viewport),
            Vec2::new(-50.0, 150.0)
        );
    }

    #[test]
    fn render_world_requests_exactly_one_snapshot() {
        let source = CountingSource {
            agents: vec![Agent::new(0.1, 0.1), Agent::new(0.2, 0.2)],
            calls: Cell::new(0),
        };
        let viewport = ViewportConfig::new(100.0, 100.0, 1.0).expect("valid viewport");
        let mut surface = RecordingSurface::new();

        let summary = render_world(
            &mut surface,
            &source,
            &viewport,
            &GlyphStyle::new(GlyphSpec::default(), GlyphKind::Square),
        )
        .expect("source is available");

        assert_eq!(source.calls.get(), 1);
        assert_eq!(summary.glyphs(), 2);
        assert_eq!(surface.draw_call_count(), 2);
    }
}
