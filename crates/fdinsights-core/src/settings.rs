//! Generation and calculator settings
//!
//! Settings are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/fdinsights/config/insights.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default settings (compiled into binary)
const DEFAULT_SETTINGS: &str = include_str!("../../../config/insights.toml");

/// Resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Sampling temperature for insight generation
    pub temperature: f32,
    /// Optional transport timeout for one insight request
    pub timeout: Option<Duration>,
    /// Model override (takes precedence over the backend's env model)
    pub model: Option<String>,
    /// Cosmetic delay applied before returning a calculation
    pub calculation_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            timeout: None,
            model: None,
            calculation_delay: Duration::from_millis(500),
        }
    }
}

impl Settings {
    /// Load settings from the default override location or embedded defaults
    pub fn load() -> Result<Self> {
        match default_settings_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => parse_settings(DEFAULT_SETTINGS),
        }
    }

    /// Load settings from a specific file, falling back to embedded defaults
    /// when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return parse_settings(DEFAULT_SETTINGS);
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read settings: {}", e)))?;
        parse_settings(&content)
    }

    /// Settings with no cosmetic delay (tests, CLI)
    pub fn without_delay(mut self) -> Self {
        self.calculation_delay = Duration::ZERO;
        self
    }
}

/// Default settings override path
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fdinsights").join("config").join("insights.toml"))
}

/// Raw settings structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawSettings {
    generation: Option<RawGeneration>,
    calculator: Option<RawCalculator>,
}

#[derive(Debug, Deserialize)]
struct RawGeneration {
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCalculator {
    delay_ms: Option<u64>,
}

/// Parse settings from TOML content
fn parse_settings(content: &str) -> Result<Settings> {
    let raw: RawSettings = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid settings TOML: {}", e)))?;

    let mut settings = Settings::default();

    if let Some(generation) = raw.generation {
        if let Some(temperature) = generation.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(Error::Config(format!(
                    "temperature must be between 0 and 2, got {}",
                    temperature
                )));
            }
            settings.temperature = temperature;
        }
        settings.timeout = generation
            .timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);
        settings.model = generation.model.filter(|m| !m.trim().is_empty());
    }

    if let Some(calculator) = raw.calculator {
        if let Some(delay) = calculator.delay_ms {
            settings.calculation_delay = Duration::from_millis(delay);
        }
    }

    Ok(settings)
}
