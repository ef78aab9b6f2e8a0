//! Configuration management for termvid
//!
//! Settings are layered: built-in defaults, then the TOML config file, then
//! command-line flags (applied by the caller).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::player::playback::{DEFAULT_LARGE_FRAME_PIXELS, DEFAULT_RESYNC_INTERVAL};
use crate::player::render::{DEFAULT_DISTANCE_THRESHOLD, DEFAULT_REDRAW_RATIO};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub playback: PlaybackConfig,
    pub timing: TimingConfig,
}

/// Frame diff settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Color distance at which a cell counts as changed
    pub optimization_level: f64,
    /// Change ratio above which a full redraw is cheaper
    pub redraw_ratio: f64,
    /// Redraw every frame in full
    pub force_redraw: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            optimization_level: DEFAULT_DISTANCE_THRESHOLD,
            redraw_ratio: DEFAULT_REDRAW_RATIO,
            force_redraw: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Seconds moved by one seek key press
    pub skip_seconds: u32,
    /// Displayed frames between audio re-seeks (0 disables)
    pub resync_interval: u64,
    /// Play the soundtrack
    pub audio: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            skip_seconds: 5,
            resync_interval: DEFAULT_RESYNC_INTERVAL,
            audio: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Late frames above this pixel area add an extra frame of drop debt
    pub large_frame_pixels: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            large_frame_pixels: DEFAULT_LARGE_FRAME_PIXELS,
        }
    }
}

impl Config {
    /// Default config file location: `<config dir>/termvid/config.toml`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("termvid").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used if present, and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::config_path() {
                Some(default) if default.is_file() => Self::load_from(&default),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Read and validate the config file at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let render = &self.render;
        if render.optimization_level.is_nan() || render.optimization_level < 0.0 {
            anyhow::bail!(
                "render.optimization_level must be >= 0, got {}",
                render.optimization_level
            );
        }
        if !(0.0..=1.0).contains(&render.redraw_ratio) {
            anyhow::bail!(
                "render.redraw_ratio must be within 0..=1, got {}",
                render.redraw_ratio
            );
        }
        if self.playback.skip_seconds == 0 {
            anyhow::bail!("playback.skip_seconds must be at least 1");
        }
        Ok(())
    }
}
