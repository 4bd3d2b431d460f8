use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Parser)]
#[command(name = "lumen_viewer")]
#[command(about = "Headless frame loop for the Lumen ray tracer")]
pub struct Args {
    /// Scene description (JSON). Uses the built-in scene when omitted
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value = "320")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "240")]
    pub height: u32,

    /// Worker threads (defaults to the scene's render section or the core count)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Number of frames to produce
    #[arg(short, long, default_value = "1")]
    pub frames: u32,

    /// Maximum reflection/refraction depth
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Print each frame to the terminal as ASCII art
    #[arg(long)]
    pub ascii: bool,

    /// Logging level (RUST_LOG still takes precedence per module)
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}
