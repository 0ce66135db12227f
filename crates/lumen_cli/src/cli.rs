use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in demo scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Random field of small spheres, some in motion
    BouncingSpheres,
    /// Two spheres with a 3D checker texture
    CheckeredSpheres,
    /// Image-textured globe
    Earth,
    /// Marble-like Perlin noise on two spheres
    PerlinSpheres,
    /// Five coloured quads
    Quads,
    /// Noise spheres lit by a quad and a sphere light
    SimpleLight,
    /// The classic Cornell box with two rotated blocks
    CornellBox,
    /// Cornell box with smoke and fog blocks
    CornellSmoke,
    /// Everything at once
    FinalScene,
    /// Ground sphere and a small sphere under a sky-blue background
    TwoSpheres,
}

/// Command line for the lumen binary.
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Offline CPU path tracer")]
pub struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value = "cornell-box")]
    pub scene: SceneKind,

    /// Image width in pixels (height follows the scene's aspect ratio)
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel, rounded down to a square number
    #[arg(long, short = 's')]
    pub spp: Option<u32>,

    /// Maximum bounces per path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for scene generation and pixel sampling
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Worker threads including the main thread (defaults to all cores)
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Output file (.ppm writes P3 text, other extensions are encoded by
    /// format). Without it the image goes to stdout as P3 text.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Logging level (overrides RUST_LOG)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}
