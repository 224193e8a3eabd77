//! Reconciliation of a map surface against itinerary state

use std::time::Instant;

use tracing::{debug, trace};

use crate::itinerary::Itinerary;
use crate::point::{Point, PointId};

use super::camera::{Camera, GeoBounds};
use super::config::{LegendPosition, MapConfig};
use super::interaction::InteractionGuard;
use super::legend::legend_lines;
use super::surface::{LegendId, LegendSpec, MapError, MapSurface, MarkerId, MarkerSpec, SurfaceFactory};

/// What clicking a marker does
#[derive(Debug, Clone, PartialEq)]
enum MarkerBinding {
    Promote(Point),
    Demote(PointId),
}

/// Action applied to the itinerary by a marker click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerAction {
    Promoted(PointId),
    Demoted(PointId),
}

/// Outcome of a reconciliation pass
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    pub candidate_markers: usize,
    pub selection_markers: usize,
    /// Legend lines shown, empty when no legend is displayed
    pub legend: Vec<String>,
    /// Whether the camera was fitted to the points
    pub camera_fitted: bool,
}

impl ReconcileReport {
    pub fn marker_count(&self) -> usize {
        self.candidate_markers + self.selection_markers
    }
}

#[derive(Debug)]
struct TrackedMarker {
    id: MarkerId,
    binding: MarkerBinding,
}

/// Owns a map surface and keeps it in sync with an itinerary
pub struct MapSyncEngine<S: MapSurface> {
    config: MapConfig,
    surface: S,
    markers: Vec<TrackedMarker>,
    legend: Option<LegendId>,
    camera: Camera,
    interaction: InteractionGuard,
}

impl<S: MapSurface> MapSyncEngine<S> {
    /// Create the surface for `config` at the default camera
    pub fn initialize<F>(factory: &mut F, config: MapConfig) -> Result<Self, MapError>
    where
        F: SurfaceFactory<Surface = S>,
    {
        Self::initialize_at(factory, config, Camera::default())
    }

    /// Create the surface for `config` showing `camera`
    pub fn initialize_at<F>(factory: &mut F, config: MapConfig, camera: Camera) -> Result<Self, MapError>
    where
        F: SurfaceFactory<Surface = S>,
    {
        let surface = factory.create(&config, camera)?;
        debug!(style = %config.style, language = %config.language, "map surface created");
        Ok(Self {
            interaction: InteractionGuard::new(config.interaction_cooldown),
            config,
            camera: surface.camera(),
            surface,
            markers: Vec::new(),
            legend: None,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Handles of the markers currently on the surface, in render order
    pub fn marker_ids(&self) -> Vec<MarkerId> {
        self.markers.iter().map(|m| m.id).collect()
    }

    pub fn is_interacting(&self, now: Instant) -> bool {
        self.interaction.is_active(now)
    }

    /// Apply a new configuration.
    ///
    /// The surface is rebuilt only when the style or language changed; the
    /// camera carries over and markers are redrawn on the next `reconcile`.
    /// Returns whether a new surface was created. On failure the current
    /// surface is kept.
    pub fn reconfigure<F>(&mut self, factory: &mut F, config: MapConfig) -> Result<bool, MapError>
    where
        F: SurfaceFactory<Surface = S>,
    {
        let rebuild = self.config.needs_new_surface(&config);
        if rebuild {
            let surface = factory.create(&config, self.camera)?;
            debug!(style = %config.style, language = %config.language, "map surface recreated");
            self.surface = surface;
            self.markers.clear();
            self.legend = None;
        }
        self.interaction.set_cooldown(config.interaction_cooldown);
        self.config = config;
        Ok(rebuild)
    }

    /// Record a user pan or zoom
    pub fn on_camera_moved(&mut self, camera: Camera, now: Instant) {
        self.surface.set_camera(camera);
        self.camera = camera;
        self.interaction.mark(now);
    }

    /// Bring markers, legend and camera in line with the given collections.
    ///
    /// Running this twice with the same inputs leaves the surface in the same
    /// visible state.
    pub fn reconcile(
        &mut self,
        candidates: &[Point],
        selection: &[Point],
        legend_position: LegendPosition,
        now: Instant,
    ) -> ReconcileReport {
        self.config.legend_position = legend_position;

        for marker in self.markers.drain(..) {
            if !self.surface.remove_marker(marker.id) {
                trace!(marker = marker.id.0, "marker already gone from surface");
            }
        }
        if let Some(legend) = self.legend.take() {
            self.surface.remove_legend(legend);
        }

        for point in candidates {
            let id = self.surface.add_marker(MarkerSpec::candidate(point));
            self.markers.push(TrackedMarker {
                id,
                binding: MarkerBinding::Promote(point.clone()),
            });
        }

        for (index, point) in selection.iter().enumerate() {
            let id = self.surface.add_marker(MarkerSpec::selected(point, index + 1));
            self.markers.push(TrackedMarker {
                id,
                binding: MarkerBinding::Demote(point.id().clone()),
            });
        }

        let legend = if !selection.is_empty() && !legend_position.is_hidden() {
            let lines = legend_lines(selection);
            self.legend = Some(self.surface.add_legend(LegendSpec {
                position: legend_position,
                lines: lines.clone(),
            }));
            lines
        } else {
            Vec::new()
        };

        let camera_fitted = if self.interaction.is_active(now) {
            false
        } else {
            let positions = candidates.iter().chain(selection).map(|p| p.position());
            match GeoBounds::enclosing(positions) {
                Some(bounds) => {
                    self.camera = self.surface.fit_bounds(
                        bounds,
                        self.config.fit_padding,
                        self.config.max_fit_zoom,
                    );
                    true
                }
                None => false,
            }
        };

        debug!(
            candidates = candidates.len(),
            selection = selection.len(),
            legend = legend.len(),
            camera_fitted,
            "reconciled map"
        );

        ReconcileReport {
            candidate_markers: candidates.len(),
            selection_markers: selection.len(),
            legend,
            camera_fitted,
        }
    }

    /// Reconcile against an itinerary using the configured legend position
    pub fn reconcile_itinerary(&mut self, itinerary: &Itinerary, now: Instant) -> ReconcileReport {
        let position = self.config.legend_position;
        self.reconcile(itinerary.candidates(), itinerary.selection(), position, now)
    }

    /// Handle a click on a marker.
    ///
    /// Candidate markers promote their point, numbered markers demote theirs.
    /// Any click on a known marker counts as a user interaction. Returns None
    /// for handles not issued by the last reconciliation and for clicks that
    /// change nothing.
    pub fn handle_marker_click(
        &mut self,
        marker: MarkerId,
        itinerary: &mut Itinerary,
        now: Instant,
    ) -> Option<MarkerAction> {
        let binding = self.markers.iter().find(|m| m.id == marker)?.binding.clone();
        self.interaction.mark(now);
        match binding {
            MarkerBinding::Promote(point) => {
                let id = point.id().clone();
                if itinerary.promote(point) {
                    Some(MarkerAction::Promoted(id))
                } else {
                    debug!(id = %id, "point already selected");
                    None
                }
            }
            MarkerBinding::Demote(id) => match itinerary.demote_id(&id) {
                Ok(_) => Some(MarkerAction::Demoted(id)),
                Err(e) => {
                    debug!(error = %e, "ignoring click on stale marker");
                    None
                }
            },
        }
    }
}
