use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_renderer::{ThreadCount, DEFAULT_BUCKET_SIZE};

/// Log levels accepted on the command line
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

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Render a JSON scene with a Whitted-style ray tracer")]
pub struct Args {
    /// Scene file to render
    pub scene: PathBuf,

    /// Output image; the format follows the extension, PNG without one
    #[arg(short, long, help = "Output image path (defaults to <scene name>.png)")]
    pub output: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value = "500")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "500")]
    pub height: u32,

    /// Render threads: 0 renders on the main thread, "auto" keeps two cores free
    #[arg(short, long, default_value = "auto")]
    pub threads: ThreadCount,

    /// Anti-aliasing grid size per axis
    #[arg(long, default_value = "1")]
    pub aa: u32,

    /// Depth of field grid size per axis, used with --aperture
    #[arg(long, default_value = "4")]
    pub dof: u32,

    /// Aperture radius; enables depth of field
    #[arg(long)]
    pub aperture: Option<f64>,

    /// Distance to the plane in focus (defaults to the view plane distance)
    #[arg(long)]
    pub focal_distance: Option<f64>,

    /// Bucket edge length in pixels
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    pub bucket_size: u32,

    /// Log progress every N percent, 0 to disable
    #[arg(long, default_value = "10")]
    pub progress: f64,

    /// Seed for anti-aliasing and depth of field jitter
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Draw white grid lines every N pixels over the render
    #[arg(long)]
    pub grid: Option<u32>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
