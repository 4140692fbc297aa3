//! Viewer settings loaded from an optional TOML file.
//!
//! The settings file only tunes presentation concerns (window size, camera
//! panning); simulation tuning always flows through world commands.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

const SUPPORTED_SETTINGS_VERSION: u32 = 1;

const DEFAULT_WINDOW_WIDTH: i32 = 960;
const DEFAULT_WINDOW_HEIGHT: i32 = 720;
const DEFAULT_EDGE_PAN_SPEED: f32 = 600.0;
const DEFAULT_EDGE_PAN_THRESHOLD: f32 = 24.0;

/// Presentation tuning applied when the macroquad window opens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerSettings {
    /// Initial window width in pixels.
    pub window_width: i32,
    /// Initial window height in pixels.
    pub window_height: i32,
    /// Edge-scroll speed in screen pixels per second.
    pub edge_pan_speed: f32,
    /// Distance from the screen edge that triggers edge scrolling, in pixels.
    pub edge_pan_threshold: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            edge_pan_speed: DEFAULT_EDGE_PAN_SPEED,
            edge_pan_threshold: DEFAULT_EDGE_PAN_THRESHOLD,
        }
    }
}

impl ViewerSettings {
    /// Returns the default settings path relative to the repository root.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathBuf::from("assets/settings.toml")
    }

    /// Loads the settings file from the default path when it exists.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn from_default_path() -> Result<Option<Self>> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(None);
        }
        Self::from_path(&path).map(Some)
    }

    /// Loads settings from the file at the provided path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read viewer settings at {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Parses settings from TOML contents.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let raw: RawSettings =
            toml::from_str(contents).context("failed to parse viewer settings toml contents")?;
        if raw.version != SUPPORTED_SETTINGS_VERSION {
            bail!(
                "unsupported viewer settings version {}; expected {}",
                raw.version,
                SUPPORTED_SETTINGS_VERSION
            );
        }

        let defaults = Self::default();
        let settings = Self {
            window_width: raw.window_width.unwrap_or(defaults.window_width),
            window_height: raw.window_height.unwrap_or(defaults.window_height),
            edge_pan_speed: raw.edge_pan_speed.unwrap_or(defaults.edge_pan_speed),
            edge_pan_threshold: raw
                .edge_pan_threshold
                .unwrap_or(defaults.edge_pan_threshold),
        };

        if settings.window_width <= 0 || settings.window_height <= 0 {
            bail!(
                "viewer settings window size must be positive, got {}x{}",
                settings.window_width,
                settings.window_height
            );
        }
        if settings.edge_pan_speed < 0.0 || settings.edge_pan_threshold < 0.0 {
            bail!("viewer settings pan tuning must not be negative");
        }

        Ok(settings)
    }
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    version: u32,
    window_width: Option<i32>,
    window_height: Option<i32>,
    edge_pan_speed: Option<f32>,
    edge_pan_threshold: Option<f32>,
}
