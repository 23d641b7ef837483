//! Reveal engine configuration system
//!
//! This crate provides centralized configuration management for the reveal
//! engine, loading preset timing and trigger settings from `reveal.toml` as
//! an alternative to hard-coded defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Error raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for the reveal engine
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RevealConfig {
    /// Visibility observer settings
    pub observer: ObserverConfig,
    /// Playback timing settings
    pub timing: TimingConfig,
    /// Scroll-trigger registry settings
    pub trigger: TriggerConfig,
    /// Easing curve settings
    pub easing: EasingConfig,
}

/// Visibility observer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Fraction of an element that must intersect the viewport before the
    /// visibility signal fires (0.0 to 1.0)
    pub threshold: f64,
}

/// Playback timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Duration of image fade-in reveals in milliseconds
    pub image_duration_ms: f32,
    /// Duration of per-word text reveals in milliseconds
    pub text_duration_ms: f32,
    /// Additional per-item delay for staggered group reveals in milliseconds
    pub stagger_ms: f32,
    /// Delay before any reveal starts in milliseconds
    pub delay_ms: f32,
    /// Vertical rise distance of fade-in reveals in pixels
    pub rise_px: f64,
}

/// Scroll-trigger registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Distance above the viewport bottom at which a registered trigger
    /// fires, in pixels (the "top bottom-=100" start window)
    pub start_offset_px: f64,
}

/// Easing curve configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EasingConfig {
    /// Curve identifier for entrance reveals (e.g. "power3.out", "ease-out")
    pub name: String,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self { threshold: 0.2 }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            image_duration_ms: 1000.0,
            text_duration_ms: 700.0,
            stagger_ms: 30.0,
            delay_ms: 0.0,
            rise_px: 30.0,
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            start_offset_px: 100.0,
        }
    }
}

impl Default for EasingConfig {
    fn default() -> Self {
        Self {
            name: "power3.out".to_string(),
        }
    }
}

impl RevealConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the reveal.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from the default location (reveal.toml in the
    /// current directory) or return default configuration if the file
    /// doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("reveal.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// This allows for temporary overrides without modifying the config file.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("REVEAL_THRESHOLD") {
            if let Ok(threshold) = val.parse::<f64>() {
                self.observer.threshold = threshold.clamp(0.0, 1.0);
            }
        }
        if let Ok(val) = std::env::var("REVEAL_STAGGER_MS") {
            if let Ok(stagger) = val.parse::<f32>() {
                self.timing.stagger_ms = stagger;
            }
        }
        if let Ok(val) = std::env::var("REVEAL_START_OFFSET_PX") {
            if let Ok(offset) = val.parse::<f64>() {
                self.trigger.start_offset_px = offset;
            }
        }
        if let Ok(val) = std::env::var("REVEAL_EASING") {
            self.easing.name = val;
        }
    }
}
