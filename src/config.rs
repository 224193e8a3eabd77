//! Planner configuration loaded from TOML
//!
//! ```toml
//! [map]
//! style = "mapbox://styles/mapbox/light-v10"
//! language = "ja"
//! legend = "top-left"
//! width = 1280
//! height = 800
//!
//! [services]
//! timeout_secs = 5
//!
//! [store]
//! path = "itinerary.json"
//! ```
//!
//! Every key is optional and falls back to its default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ariadne::{Color, Label, Report, ReportKind, Source};
use serde::Deserialize;
use thiserror::Error;

use crate::map::config::DEFAULT_STYLE;
use crate::map::{Language, LegendPosition, MapConfig, Viewport};
use crate::renderer::SvgConfig;
use crate::services::debounce::DEFAULT_DEBOUNCE;
use crate::services::points::DEFAULT_POINTS_URL;
use crate::services::search::DEFAULT_SEARCH_URL;

/// Default location of the state file
pub const DEFAULT_STATE_PATH: &str = "at-planner.json";

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl ConfigError {
    /// Format the error with source context using ariadne.
    ///
    /// Errors without a source location fall back to their plain message.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let ConfigError::ParseError(err) = self else {
            return self.to_string();
        };
        let Some(span) = err.span() else {
            return self.to_string();
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid configuration")
            .with_label(
                Label::new((filename, span))
                    .with_message(err.message())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// `[map]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapSection {
    pub style: String,
    pub language: Language,
    pub legend: LegendPosition,
    pub width: f64,
    pub height: f64,
    pub fit_padding: f64,
    pub max_fit_zoom: f64,
    pub cooldown_ms: u64,
}

impl Default for MapSection {
    fn default() -> Self {
        let map = MapConfig::default();
        let viewport = Viewport::default();
        Self {
            style: DEFAULT_STYLE.to_string(),
            language: map.language,
            legend: map.legend_position,
            width: viewport.width,
            height: viewport.height,
            fit_padding: map.fit_padding,
            max_fit_zoom: map.max_fit_zoom,
            cooldown_ms: map.interaction_cooldown.as_millis() as u64,
        }
    }
}

/// `[services]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServicesSection {
    pub search_url: String,
    pub points_url: String,
    pub timeout_secs: u64,
    pub debounce_ms: u64,
}

impl Default for ServicesSection {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            points_url: DEFAULT_POINTS_URL.to_string(),
            timeout_secs: 10,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

/// `[store]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub path: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STATE_PATH),
        }
    }
}

/// Complete planner configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    pub map: MapSection,
    pub services: ServicesSection,
    pub store: StoreSection,
}

impl PlannerConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check numeric settings that TOML accepts but the map cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("map.fit_padding", self.map.fit_padding),
            ("map.max_fit_zoom", self.map.max_fit_zoom),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: format!("expected a finite number >= 0, got {}", value),
                });
            }
        }
        for (key, value) in [("map.width", self.map.width), ("map.height", self.map.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: format!("expected a finite number > 0, got {}", value),
                });
            }
        }
        Ok(())
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.map.style = style.into();
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.map.language = language;
        self
    }

    pub fn with_legend_position(mut self, position: LegendPosition) -> Self {
        self.map.legend = position;
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store.path = path.into();
        self
    }

    /// Engine configuration from the `[map]` section
    pub fn map_config(&self) -> MapConfig {
        MapConfig::new()
            .with_style(self.map.style.clone())
            .with_language(self.map.language)
            .with_legend_position(self.map.legend)
            .with_fit_padding(self.map.fit_padding)
            .with_max_fit_zoom(self.map.max_fit_zoom)
            .with_interaction_cooldown(Duration::from_millis(self.map.cooldown_ms))
    }

    /// Surface configuration from the `[map]` viewport
    pub fn svg_config(&self) -> SvgConfig {
        SvgConfig::new().with_viewport(self.map.width, self.map.height)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.services.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.services.debounce_ms)
    }
}
