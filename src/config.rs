// Application configuration: a RON file with sensible defaults, overridden by
// command-line flags.

use crate::compositor::Mode;
use crate::emitter::EmitterConfig;
use crate::error::Error;
use crate::params::OpticalParams;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Which program starts on screen.
    pub mode: Mode,
    /// Window settings.
    pub window: WindowConfig,
    /// Background source.
    pub background: BackgroundConfig,
    /// Optics for the ripple program.
    pub ripple: OpticalParams,
    /// Optics for the droplet program; missing fields keep the droplet preset.
    #[serde(deserialize_with = "crate::params::deserialize_droplet")]
    pub droplet: OpticalParams,
    /// Pointer -> ripple emitter.
    pub emitter: EmitterConfig,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Width in pixels; the background is stretched to fit.
    pub width: u32,
    pub height: u32,
    pub title: String,
}

/// Where the picture behind the glass comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Picture to refract; a checkerboard is used when unset or unreadable.
    pub image: Option<PathBuf>,
    /// Checkerboard tile size in pixels.
    pub checker_tile: u32,
    /// Camera device index, used with `--camera`.
    pub camera_index: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Ripple,
            window: WindowConfig::default(),
            background: BackgroundConfig::default(),
            ripple: OpticalParams::ripple(),
            droplet: OpticalParams::droplet(),
            emitter: EmitterConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width: 800, height: 600, title: "Liquid Glass".to_string() }
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self { image: None, checker_tile: 64, camera_index: 0 }
    }
}

impl Config {
    /// Parse a RON config file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(Error::ConfigRead)?;
        let config: Config = ron::from_str(&contents).map_err(Error::ConfigParse)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Write the config as pretty RON.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        std::fs::write(path, self.to_ron()?).map_err(Error::ConfigWrite)?;
        Ok(())
    }

    pub fn to_ron(&self) -> Result<String, Error> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, pretty).map_err(Error::ConfigSerialize)
    }

    /// Optics for the given program.
    pub fn params(&self, mode: Mode) -> &OpticalParams {
        match mode {
            Mode::Ripple => &self.ripple,
            Mode::Droplet => &self.droplet,
        }
    }

    pub fn params_mut(&mut self, mode: Mode) -> &mut OpticalParams {
        match mode {
            Mode::Ripple => &mut self.ripple,
            Mode::Droplet => &mut self.droplet,
        }
    }

    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(ref image) = args.image {
            self.background.image = Some(image.clone());
        }
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.log_level = level.clone();
        }
    }
}

/// Command-line arguments. Values override the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "liquid-glass", about = "Liquid glass ripples and droplets over a picture")]
pub struct CliArgs {
    /// RON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Program to start with.
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Background picture.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Window width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Refract the live camera instead of a picture (needs the `camera` feature).
    #[arg(long)]
    pub camera: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the effective config as RON and exit.
    #[arg(long)]
    pub dump_config: bool,
}
