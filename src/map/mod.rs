//! Map synchronization engine
//!
//! This module owns a single long-lived [`MapSurface`] and keeps its markers,
//! legend overlay and camera framing consistent with an itinerary. The host
//! calls [`MapSyncEngine::reconcile`] after every change to the candidates,
//! the selection or the legend placement.

pub mod camera;
pub mod config;
pub mod engine;
pub mod interaction;
pub mod legend;
pub mod surface;

pub use camera::{Camera, GeoBounds, Viewport};
pub use config::{Language, LegendPosition, MapConfig};
pub use engine::{MapSyncEngine, MarkerAction, ReconcileReport};
pub use interaction::InteractionGuard;
pub use legend::legend_lines;
pub use surface::{
    LegendId, LegendSpec, MapError, MapSurface, MarkerId, MarkerKind, MarkerSpec, Popup,
    SurfaceFactory,
};
