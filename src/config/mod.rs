//! Configuration management
//!
//! Parses TOML configuration and provides renderer settings.
//! Everything has a default; an empty config is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};

/// Renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display settings
    pub display: DisplayConfig,
    /// String cache settings
    pub cache: CacheConfig,
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target framebuffer width (pixels)
    pub width: f32,
    /// Target framebuffer height (pixels)
    pub height: f32,
}

/// String cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached strings. `None` (the default) grows
    /// without bound; setting a limit refuses new strings past it.
    pub limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { limit: None }
    }
}

impl Config {
    /// Parse settings from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse config")
    }
}
