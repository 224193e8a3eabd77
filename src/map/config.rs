//! Configuration for the map sync engine

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::interaction::DEFAULT_COOLDOWN;

/// Default base map style
pub const DEFAULT_STYLE: &str = "mapbox://styles/mapbox/streets-v11";

/// Error for an unrecognized enum value in configuration or on the command line
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Map label language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh-Hans")]
    ZhHans,
    #[serde(rename = "ja")]
    Ja,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::ZhHans => "zh-Hans",
            Language::Ja => "ja",
        }
    }

    /// The other supported language
    pub fn toggled(&self) -> Self {
        match self {
            Language::ZhHans => Language::Ja,
            Language::Ja => Language::ZhHans,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zh-Hans" | "zh" => Ok(Language::ZhHans),
            "ja" => Ok(Language::Ja),
            _ => Err(UnknownValue {
                kind: "language",
                value: s.to_string(),
                expected: "zh-Hans, ja",
            }),
        }
    }
}

/// Where the legend overlay is placed on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendPosition {
    TopLeft,
    BottomLeft,
    TopRight,
    #[default]
    BottomRight,
    Hidden,
}

impl LegendPosition {
    pub fn name(&self) -> &'static str {
        match self {
            LegendPosition::TopLeft => "top-left",
            LegendPosition::BottomLeft => "bottom-left",
            LegendPosition::TopRight => "top-right",
            LegendPosition::BottomRight => "bottom-right",
            LegendPosition::Hidden => "hidden",
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, LegendPosition::Hidden)
    }
}

impl fmt::Display for LegendPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LegendPosition {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-left" => Ok(LegendPosition::TopLeft),
            "bottom-left" => Ok(LegendPosition::BottomLeft),
            "top-right" => Ok(LegendPosition::TopRight),
            "bottom-right" => Ok(LegendPosition::BottomRight),
            "hidden" => Ok(LegendPosition::Hidden),
            _ => Err(UnknownValue {
                kind: "legend position",
                value: s.to_string(),
                expected: "top-left, bottom-left, top-right, bottom-right, hidden",
            }),
        }
    }
}

/// Configuration options for the map sync engine
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Base map style identifier
    pub style: String,

    /// Label language
    pub language: Language,

    /// Legend placement
    pub legend_position: LegendPosition,

    /// Pixels kept free around the fitted points
    pub fit_padding: f64,

    /// Highest zoom used when fitting the camera
    pub max_fit_zoom: f64,

    /// Quiet period after a user interaction before auto-fit resumes
    pub interaction_cooldown: Duration,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style: DEFAULT_STYLE.to_string(),
            language: Language::default(),
            legend_position: LegendPosition::default(),
            fit_padding: 50.0,
            max_fit_zoom: 15.0,
            interaction_cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl MapConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base map style
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the label language
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the legend placement
    pub fn with_legend_position(mut self, position: LegendPosition) -> Self {
        self.legend_position = position;
        self
    }

    /// Set the fit padding
    pub fn with_fit_padding(mut self, padding: f64) -> Self {
        self.fit_padding = padding;
        self
    }

    /// Set the maximum zoom used by auto-fit
    pub fn with_max_fit_zoom(mut self, zoom: f64) -> Self {
        self.max_fit_zoom = zoom;
        self
    }

    /// Set the interaction cooldown
    pub fn with_interaction_cooldown(mut self, cooldown: Duration) -> Self {
        self.interaction_cooldown = cooldown;
        self
    }

    /// Whether switching to `other` requires a new surface.
    ///
    /// Style and language change the server-rendered tiles and labels; every
    /// other setting is applied in place.
    pub fn needs_new_surface(&self, other: &MapConfig) -> bool {
        self.style != other.style || self.language != other.language
    }
}
