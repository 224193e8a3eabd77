//! The rendering target the engine drives
//!
//! A [`MapSurface`] is anything that can show markers, a legend overlay and a
//! camera: an SVG canvas, a GUI widget, a web map bridge. Surfaces are created
//! through a [`SurfaceFactory`] so the engine can rebuild them when the base
//! style or label language changes.

use thiserror::Error;

use crate::point::{LatLon, Point};

use super::camera::{Camera, GeoBounds};
use super::config::{LegendPosition, MapConfig};

/// Errors raised while creating a map surface
#[derive(Debug, Error)]
pub enum MapError {
    /// The base style identifier is empty or not supported by the surface
    #[error("invalid map style '{style}': {reason}")]
    InvalidStyle { style: String, reason: String },

    /// The surface cannot be sized as requested
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

/// Handle of a marker placed on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Handle of a legend overlay placed on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegendId(pub u64);

/// Visual treatment of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// A fetched point that is not in the itinerary yet (location pin)
    Candidate,
    /// An itinerary entry, numbered by its 1-based position
    Selected { number: usize },
}

/// Popup content attached to a marker. Missing fields are left out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Popup {
    pub title: String,
    pub group: Option<String>,
    pub thumbnail: Option<String>,
    pub episode: Option<String>,
}

impl Popup {
    pub fn for_point(point: &Point) -> Self {
        let episode = match (point.season(), point.episode()) {
            (Some(s), Some(ep)) => Some(format!("S{} EP{}", s, ep)),
            (None, Some(ep)) => Some(format!("EP{}", ep)),
            (Some(s), None) => Some(format!("S{}", s)),
            (None, None) => None,
        };
        Self {
            title: point.name().to_string(),
            group: point.group().map(str::to_string),
            thumbnail: point.thumbnail().map(str::to_string),
            episode,
        }
    }

    /// Text lines of the popup, in display order
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];
        lines.extend(self.group.clone());
        lines.extend(self.episode.clone());
        lines
    }
}

/// Everything a surface needs to draw one marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub kind: MarkerKind,
    pub position: LatLon,
    pub popup: Popup,
}

impl MarkerSpec {
    pub fn candidate(point: &Point) -> Self {
        Self {
            kind: MarkerKind::Candidate,
            position: point.position(),
            popup: Popup::for_point(point),
        }
    }

    pub fn selected(point: &Point, number: usize) -> Self {
        Self {
            kind: MarkerKind::Selected { number },
            position: point.position(),
            popup: Popup::for_point(point),
        }
    }
}

/// Legend overlay content
#[derive(Debug, Clone, PartialEq)]
pub struct LegendSpec {
    pub position: LegendPosition,
    pub lines: Vec<String>,
}

/// A live map the engine can draw on.
///
/// Marker and legend handles are only meaningful for the surface that issued
/// them.
pub trait MapSurface {
    /// Place a marker and return its handle
    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId;

    /// Remove a marker; returns false if the handle is unknown
    fn remove_marker(&mut self, id: MarkerId) -> bool;

    /// Show a legend overlay and return its handle
    fn add_legend(&mut self, legend: LegendSpec) -> LegendId;

    /// Remove a legend overlay; returns false if the handle is unknown
    fn remove_legend(&mut self, id: LegendId) -> bool;

    /// Current camera
    fn camera(&self) -> Camera;

    /// Jump to a camera chosen by the user
    fn set_camera(&mut self, camera: Camera);

    /// Animate the camera so that `bounds` fits with `padding` pixels to spare,
    /// zooming in no further than `max_zoom`. Returns the resulting camera.
    fn fit_bounds(&mut self, bounds: GeoBounds, padding: f64, max_zoom: f64) -> Camera;
}

/// Creates surfaces for a given style and language
pub trait SurfaceFactory {
    type Surface: MapSurface;

    /// Build a fresh surface showing `camera`
    fn create(&mut self, config: &MapConfig, camera: Camera) -> Result<Self::Surface, MapError>;
}
