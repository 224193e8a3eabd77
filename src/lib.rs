//! AT Planner - plan anime pilgrimage itineraries on a map
//!
//! This library provides the point model, the candidate/selection itinerary,
//! and an engine that keeps a map surface (markers, numbered legend, camera
//! framing) in sync with that itinerary. Thin adapters for title search, point
//! lookup, JSON persistence and SVG export make it usable end to end.
//!
//! # Example
//!
//! ```rust
//! use at_planner::{render_itinerary, Itinerary, PlannerConfig, Point};
//!
//! let mut itinerary = Itinerary::new();
//! itinerary.promote(Point::new("1", "Uji Bridge", 34.8917, 135.8075));
//! let svg = render_itinerary(&itinerary, &PlannerConfig::default()).unwrap();
//! assert!(svg.contains("1：Uji Bridge"));
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod itinerary;
pub mod map;
pub mod planner;
pub mod point;
pub mod renderer;
pub mod services;
pub mod store;

pub use config::{ConfigError, PlannerConfig};
pub use error::PlannerError;
pub use export::{export_svg, to_data_uri, wrap_text, ExportConfig};
pub use itinerary::{ClearPolicy, Itinerary, ItineraryError};
pub use map::{
    Camera, Language, LegendPosition, MapConfig, MapError, MapSurface, MapSyncEngine,
    MarkerAction, ReconcileReport, SurfaceFactory,
};
pub use planner::Planner;
pub use point::{LatLon, Point, PointId};
pub use renderer::{SvgConfig, SvgSurface, SvgSurfaceFactory};
pub use services::{FetchError, SearchBox, TitleHit};
pub use store::{FileStore, StoreError};

use std::time::Instant;

/// Render an itinerary to SVG in one call.
///
/// Creates an SVG surface from `config`, reconciles it once and renders it.
pub fn render_itinerary(itinerary: &Itinerary, config: &PlannerConfig) -> Result<String, PlannerError> {
    let factory = SvgSurfaceFactory::new(config.svg_config());
    let mut planner = Planner::new(factory, config.map_config(), itinerary.clone())?;
    planner.refresh(Instant::now());
    Ok(planner.surface().render())
}
