//! A planning session
//!
//! [`Planner`] wires the itinerary, the map engine and the optional state file
//! together. Every mutation is persisted first and then reconciled onto the
//! map, so the surface always shows what would be reloaded from disk.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::PlannerError;
use crate::itinerary::{ClearPolicy, Itinerary};
use crate::map::{
    Camera, LegendPosition, MapConfig, MapSyncEngine, MarkerAction, MarkerId, ReconcileReport,
    SurfaceFactory,
};
use crate::point::{Point, PointId};
use crate::services::{fetch_points, PointLookup};
use crate::store::FileStore;

pub struct Planner<F: SurfaceFactory> {
    factory: F,
    engine: MapSyncEngine<F::Surface>,
    itinerary: Itinerary,
    store: Option<FileStore>,
}

impl<F: SurfaceFactory> Planner<F> {
    /// Start an in-memory session
    pub fn new(mut factory: F, config: MapConfig, itinerary: Itinerary) -> Result<Self, PlannerError> {
        let engine = MapSyncEngine::initialize(&mut factory, config)?;
        Ok(Self {
            factory,
            engine,
            itinerary,
            store: None,
        })
    }

    /// Start a session backed by a state file, reading it once
    pub fn open(factory: F, config: MapConfig, store: FileStore) -> Result<Self, PlannerError> {
        let itinerary = store.load()?;
        info!(
            path = %store.path().display(),
            candidates = itinerary.candidates().len(),
            selection = itinerary.selection().len(),
            "state loaded"
        );
        let mut planner = Self::new(factory, config, itinerary)?;
        planner.store = Some(store);
        Ok(planner)
    }

    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    pub fn engine(&self) -> &MapSyncEngine<F::Surface> {
        &self.engine
    }

    pub fn surface(&self) -> &F::Surface {
        self.engine.surface()
    }

    pub fn config(&self) -> &MapConfig {
        self.engine.config()
    }

    /// Reconcile the map without changing state
    pub fn refresh(&mut self, now: Instant) -> ReconcileReport {
        self.engine.reconcile_itinerary(&self.itinerary, now)
    }

    fn commit(&mut self, now: Instant) -> Result<ReconcileReport, PlannerError> {
        if let Some(store) = &self.store {
            if !store.save(&self.itinerary)? && store.remove()? {
                debug!(path = %store.path().display(), "itinerary emptied, state file removed");
            }
        }
        Ok(self.refresh(now))
    }

    /// Replace the candidates with the points of a newly selected title
    pub fn load_title(&mut self, points: Vec<Point>, now: Instant) -> Result<ReconcileReport, PlannerError> {
        self.itinerary.load_candidates(points);
        self.commit(now)
    }

    /// Fetch the points of `title_id` and load them as candidates.
    ///
    /// A failed lookup loads an empty candidate list.
    pub fn fetch_title(
        &mut self,
        lookup: &dyn PointLookup,
        title_id: u64,
        group: Option<&str>,
        now: Instant,
    ) -> Result<ReconcileReport, PlannerError> {
        let points = fetch_points(lookup, Some(title_id), group);
        self.load_title(points, now)
    }

    /// Promote a candidate by id. Already selected ids are left alone.
    pub fn promote(&mut self, id: &PointId, now: Instant) -> Result<ReconcileReport, PlannerError> {
        if !self.itinerary.is_selected(id) && self.itinerary.promote_id(id).is_none() {
            return Err(PlannerError::UnknownPoint { id: id.to_string() });
        }
        self.commit(now)
    }

    /// Demote the selection entry at the 0-based `index`
    pub fn demote(&mut self, index: usize, now: Instant) -> Result<ReconcileReport, PlannerError> {
        self.itinerary.demote(index)?;
        self.commit(now)
    }

    pub fn reorder(&mut self, from: usize, to: usize, now: Instant) -> Result<ReconcileReport, PlannerError> {
        self.itinerary.reorder(from, to)?;
        self.commit(now)
    }

    pub fn clear(&mut self, policy: ClearPolicy, now: Instant) -> Result<ReconcileReport, PlannerError> {
        let cleared = self.itinerary.clear_selection(policy);
        debug!(cleared = cleared.len(), ?policy, "selection cleared");
        self.commit(now)
    }

    pub fn hide(&mut self, now: Instant) -> Result<ReconcileReport, PlannerError> {
        self.itinerary.hide_candidates();
        self.commit(now)
    }

    pub fn unhide(&mut self, now: Instant) -> Result<ReconcileReport, PlannerError> {
        self.itinerary.unhide_candidates();
        self.commit(now)
    }

    /// Apply a new map configuration and redraw.
    ///
    /// Returns whether the surface was rebuilt.
    pub fn reconfigure(&mut self, config: MapConfig, now: Instant) -> Result<bool, PlannerError> {
        let rebuilt = self.engine.reconfigure(&mut self.factory, config)?;
        self.refresh(now);
        Ok(rebuilt)
    }

    /// Switch between the supported label languages
    pub fn toggle_language(&mut self, now: Instant) -> Result<bool, PlannerError> {
        let config = self.config().clone();
        let language = config.language.toggled();
        self.reconfigure(config.with_language(language), now)
    }

    pub fn set_legend_position(
        &mut self,
        position: LegendPosition,
        now: Instant,
    ) -> Result<ReconcileReport, PlannerError> {
        let config = self.config().clone().with_legend_position(position);
        self.engine.reconfigure(&mut self.factory, config)?;
        Ok(self.refresh(now))
    }

    /// Forward a marker click; persists and redraws when it changed the itinerary
    pub fn click(&mut self, marker: MarkerId, now: Instant) -> Result<Option<MarkerAction>, PlannerError> {
        let action = self.engine.handle_marker_click(marker, &mut self.itinerary, now);
        if action.is_some() {
            self.commit(now)?;
        }
        Ok(action)
    }

    /// Forward a user pan or zoom
    pub fn camera_moved(&mut self, camera: Camera, now: Instant) {
        self.engine.on_camera_moved(camera, now);
    }
}
