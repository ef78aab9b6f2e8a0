//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::Config;
use crate::player::SessionOptions;

/// Version string: crate version, git commit and build date.
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("TERMVID_BUILD_DATE"),
    ")"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "termvid",
    version = VERSION,
    about = "Play videos in the terminal with 24-bit colored half-blocks",
    after_help = "Controls:\n  \
        space, k     Pause / resume\n  \
        l, Right     Seek forward\n  \
        j, Left      Seek backward\n  \
        r            Redraw the whole frame\n  \
        q, Esc       Quit"
)]
pub struct Cli {
    /// Video file to play
    #[arg(value_name = "VIDEO")]
    pub video: PathBuf,

    /// Color distance below which a cell is left untouched (higher is faster, blockier)
    #[arg(short = 'o', long, value_name = "LEVEL", value_parser = parse_non_negative)]
    pub optimization_level: Option<f64>,

    /// Redraw every frame in full instead of diffing
    #[arg(short = 'r', long)]
    pub redraw: bool,

    /// Changed-cell ratio above which a frame is redrawn in full
    #[arg(long, value_name = "RATIO", value_parser = parse_ratio)]
    pub redraw_ratio: Option<f64>,

    /// Seconds skipped by one seek key press
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u32).range(1..))]
    pub skip_seconds: Option<u32>,

    /// Play without sound
    #[arg(long)]
    pub no_audio: bool,

    /// Config file (default: <config dir>/termvid/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log level for --log-file
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(level) = self.optimization_level {
            config.render.optimization_level = level;
        }
        if let Some(ratio) = self.redraw_ratio {
            config.render.redraw_ratio = ratio;
        }
        if self.redraw {
            config.render.force_redraw = true;
        }
        if let Some(seconds) = self.skip_seconds {
            config.playback.skip_seconds = seconds;
        }
        if self.no_audio {
            config.playback.audio = false;
        }
    }

    /// Session settings from `config` with this command line applied.
    pub fn session_options(&self, mut config: Config) -> SessionOptions {
        self.apply_to(&mut config);
        SessionOptions::from(&config)
    }
}

fn parse_non_negative(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a number >= 0, got {}", raw))
    }
}

fn parse_ratio(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("must be between 0 and 1, got {}", raw))
    }
}
