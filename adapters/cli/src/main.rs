#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that draws a Meadow world snapshot.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use meadow_rendering::{
    render_frame, viewport_from_display, Color, DisplayMetrics, FixedDisplay, GlyphKind,
    GlyphStyle, Presentation, RecordingSurface, RenderingBackend,
};
use meadow_rendering_macroquad::MacroquadBackend;
use meadow_world::World;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::{Settings, ViewerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "meadow",
    version,
    about = "Draw one frame of the Meadow simulation"
)]
pub(crate) struct Cli {
    /// TOML file providing viewport, glyph and world settings.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Logical viewport width in pixels.
    #[arg(long)]
    pub(crate) width: Option<f32>,
    /// Logical viewport height in pixels.
    #[arg(long)]
    pub(crate) height: Option<f32>,
    /// Physical pixels per logical pixel; queried from the display when omitted.
    #[arg(long)]
    pub(crate) pixel_ratio: Option<f32>,
    /// Glyph drawn for every agent.
    #[arg(long, value_enum)]
    pub(crate) glyph: Option<GlyphArg>,
    /// Glyph size as a fraction of the viewport width.
    #[arg(long)]
    pub(crate) size_fraction: Option<f32>,
    /// Number of animals in the generated world.
    #[arg(long)]
    pub(crate) agents: Option<usize>,
    /// Seed for world generation; a random seed is logged when omitted.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print the recorded frame as JSON instead of opening a window.
    #[arg(long)]
    pub(crate) headless: bool,
    /// Render without a simulation engine.
    #[arg(long)]
    pub(crate) no_engine: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum GlyphArg {
    Square,
    Triangle,
}

impl From<GlyphArg> for GlyphKind {
    fn from(value: GlyphArg) -> Self {
        match value {
            GlyphArg::Square => Self::Square,
            GlyphArg::Triangle => Self::Triangle,
        }
    }
}

/// Frame description printed by `--headless`.
#[derive(Debug, Serialize)]
struct HeadlessFrame<'a> {
    buffer_size: Option<(u32, u32)>,
    display_size: Option<(f32, f32)>,
    glyphs: usize,
    commands: &'a [meadow_rendering::DrawCommand],
}

impl<'a> HeadlessFrame<'a> {
    fn new(recording: &'a RecordingSurface) -> Self {
        Self {
            buffer_size: recording.buffer_size(),
            display_size: recording.display_size(),
            glyphs: recording.draw_call_count(),
            commands: recording.commands(),
        }
    }
}

/// Entry point for the Meadow command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let file = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    let settings = Settings::resolve(&cli, file)?;
    let engine = build_engine(&settings, cli.no_engine);

    if cli.headless {
        run_headless(&settings, &engine)
    } else {
        run_windowed(settings, engine)
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_engine(settings: &Settings, no_engine: bool) -> Option<World> {
    if no_engine {
        tracing::warn!("running without a simulation engine");
        return None;
    }

    let seed = settings.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, agents = settings.agents, "generating world");
    Some(World::with_seed(seed, settings.agents))
}

/// Runs the render pass once against `display`, capturing it for presentation.
///
/// Fails without returning a frame when the engine cannot provide a snapshot.
fn record_frame(
    display: &dyn DisplayMetrics,
    engine: &Option<World>,
    style: &GlyphStyle,
) -> Result<RecordingSurface> {
    let viewport =
        viewport_from_display(display).context("display reported an unusable viewport")?;
    let mut surface = RecordingSurface::new();

    let summary = render_frame(&mut surface, engine, &viewport, style)
        .context("render pass aborted")?;
    tracing::info!(glyphs = summary.glyphs(), "frame recorded");

    Ok(surface)
}

fn run_headless(settings: &Settings, engine: &Option<World>) -> Result<()> {
    let display = FixedDisplay::new(settings.width, settings.height, settings.pixel_ratio);
    let recording = record_frame(&display, engine, &settings.style)?;
    let json = serde_json::to_string_pretty(&HeadlessFrame::new(&recording))
        .context("failed to serialise recorded frame")?;
    println!("{json}");
    Ok(())
}

fn run_windowed(settings: Settings, engine: Option<World>) -> Result<()> {
    let presentation = Presentation::new("Meadow", Color::WHITE, settings.width, settings.height)
        .with_pixel_ratio(settings.pixel_ratio);
    let style = settings.style;

    MacroquadBackend::new()
        .with_vsync(true)
        .present(presentation, move |display| {
            record_frame(display, &engine, &style)
        })
}
