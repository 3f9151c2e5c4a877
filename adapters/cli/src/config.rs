//! Viewer settings assembled from defaults, an optional TOML file and flags.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use meadow_core::{GlyphSpec, DEFAULT_SIZE_FRACTION};
use meadow_rendering::{Color, GlyphKind, GlyphStyle};
use meadow_world::DEFAULT_POPULATION;
use serde::Deserialize;

use crate::Cli;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Logical viewport edge used when neither the file nor the flags set one.
pub(crate) const DEFAULT_VIEWPORT_EDGE: f32 = 960.0;

/// Validated contents of a viewer configuration file.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ViewerConfig {
    viewport: ViewportSection,
    glyph: GlyphSection,
    world: WorldSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    version: u32,
    #[serde(default)]
    viewport: ViewportSection,
    #[serde(default)]
    glyph: GlyphSection,
    #[serde(default)]
    world: WorldSection,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewportSection {
    width: Option<f32>,
    height: Option<f32>,
    pixel_ratio: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct GlyphSection {
    kind: Option<GlyphKind>,
    size_fraction: Option<f32>,
    color: Option<[u8; 3]>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct WorldSection {
    agents: Option<usize>,
    seed: Option<u64>,
}

impl ViewerConfig {
    /// Reads and validates the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read viewer config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid viewer config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).context("failed to parse viewer config toml contents")?;
        if file.version != SUPPORTED_CONFIG_VERSION {
            bail!(
                "unsupported viewer config version {}; expected {}",
                file.version,
                SUPPORTED_CONFIG_VERSION
            );
        }
        Ok(Self {
            viewport: file.viewport,
            glyph: file.glyph,
            world: file.world,
        })
    }
}

/// Fully resolved options for a single viewer run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) pixel_ratio: Option<f32>,
    pub(crate) style: GlyphStyle,
    pub(crate) agents: usize,
    pub(crate) seed: Option<u64>,
}

impl Settings {
    /// Layers command-line flags over the file, and the file over defaults.
    pub(crate) fn resolve(cli: &Cli, file: ViewerConfig) -> Result<Self> {
        let ViewerConfig {
            viewport,
            glyph,
            world,
        } = file;

        let size_fraction = cli
            .size_fraction
            .or(glyph.size_fraction)
            .unwrap_or(DEFAULT_SIZE_FRACTION);
        let spec = GlyphSpec::new(size_fraction).context("invalid glyph size fraction")?;
        let kind = cli.glyph.map(GlyphKind::from).or(glyph.kind).unwrap_or_default();
        let fill = glyph
            .color
            .map(|[red, green, blue]| Color::from_rgb_u8(red, green, blue))
            .unwrap_or_default();

        Ok(Self {
            width: cli.width.or(viewport.width).unwrap_or(DEFAULT_VIEWPORT_EDGE),
            height: cli
                .height
                .or(viewport.height)
                .unwrap_or(DEFAULT_VIEWPORT_EDGE),
            pixel_ratio: cli.pixel_ratio.or(viewport.pixel_ratio),
            style: GlyphStyle::new(spec, kind).with_fill(fill),
            agents: cli.agents.or(world.agents).unwrap_or(DEFAULT_POPULATION),
            seed: cli.seed.or(world.seed),
        })
    }
}
