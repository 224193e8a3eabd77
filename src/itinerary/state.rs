//! Candidate and selection collections with their transition rules

use std::collections::HashSet;

use tracing::debug;

use crate::point::{Point, PointId};

use super::ItineraryError;

/// What `clear_selection` does with the cleared entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearPolicy {
    /// Drop the entries
    #[default]
    Discard,
    /// Move the entries back into the candidates
    Recycle,
}

/// Candidates plus the ordered selection.
///
/// A given point id is never present in both collections, and appears at most
/// once in each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Itinerary {
    candidates: Vec<Point>,
    selection: Vec<Point>,
    hidden: Option<Vec<Point>>,
}

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an itinerary from persisted collections.
    ///
    /// Duplicate ids are dropped (first occurrence wins) and candidates that are
    /// already selected are discarded, so a hand-edited state file cannot break
    /// the disjointness of the two collections.
    pub fn from_parts(candidates: Vec<Point>, selection: Vec<Point>) -> Self {
        let mut seen = HashSet::new();
        let selection: Vec<Point> = selection
            .into_iter()
            .filter(|p| seen.insert(p.id().clone()))
            .collect();
        let mut itinerary = Self {
            candidates: Vec::new(),
            selection,
            hidden: None,
        };
        itinerary.load_candidates(candidates);
        itinerary
    }

    /// Restore a hidden-candidates buffer read back from persisted state
    pub fn with_hidden(mut self, hidden: Vec<Point>) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn candidates(&self) -> &[Point] {
        &self.candidates
    }

    pub fn selection(&self) -> &[Point] {
        &self.selection
    }

    /// Candidates currently parked by `hide_candidates`
    pub fn hidden(&self) -> Option<&[Point]> {
        self.hidden.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.is_some()
    }

    /// True when both visible collections are empty
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty() && self.selection.is_empty()
    }

    pub fn is_selected(&self, id: &PointId) -> bool {
        self.selection.iter().any(|p| p.id() == id)
    }

    pub fn candidate(&self, id: &PointId) -> Option<&Point> {
        self.candidates.iter().find(|p| p.id() == id)
    }

    /// Index of a point in the selection
    pub fn position_of(&self, id: &PointId) -> Option<usize> {
        self.selection.iter().position(|p| p.id() == id)
    }

    /// Replace the candidates with freshly fetched points.
    ///
    /// Points already in the selection are left out, as are repeated ids
    /// within `points`.
    pub fn load_candidates(&mut self, points: impl IntoIterator<Item = Point>) {
        let mut seen: HashSet<PointId> = self.selection.iter().map(|p| p.id().clone()).collect();
        self.candidates = points
            .into_iter()
            .filter(|p| seen.insert(p.id().clone()))
            .collect();
        debug!(
            candidates = self.candidates.len(),
            selection = self.selection.len(),
            "loaded candidates"
        );
    }

    /// Move a point to the end of the selection.
    ///
    /// The point is removed from the candidates by id. A point that is not a
    /// candidate is still appended. Returns false (and does nothing) if the id
    /// is already selected.
    pub fn promote(&mut self, point: Point) -> bool {
        if self.is_selected(point.id()) {
            return false;
        }
        self.candidates.retain(|p| p.id() != point.id());
        self.selection.push(point);
        true
    }

    /// Promote the candidate with the given id
    pub fn promote_id(&mut self, id: &PointId) -> Option<&Point> {
        let index = self.candidates.iter().position(|p| p.id() == id)?;
        let point = self.candidates.remove(index);
        self.selection.push(point);
        self.selection.last()
    }

    /// Remove the selection entry at `index` and hand it back to the candidates
    pub fn demote(&mut self, index: usize) -> Result<&Point, ItineraryError> {
        if index >= self.selection.len() {
            return Err(ItineraryError::out_of_range(index, self.selection.len()));
        }
        let point = self.selection.remove(index);
        self.candidates.retain(|p| p.id() != point.id());
        self.candidates.push(point);
        Ok(&self.candidates[self.candidates.len() - 1])
    }

    /// Demote a selected point by id
    pub fn demote_id(&mut self, id: &PointId) -> Result<&Point, ItineraryError> {
        let index = self
            .position_of(id)
            .ok_or_else(|| ItineraryError::NotSelected { id: id.to_string() })?;
        self.demote(index)
    }

    /// Move the selection entry at `from` so that it ends up at index `to`.
    ///
    /// The entry is removed first and reinserted into the remaining sequence,
    /// so `[A, B, C]` with `reorder(0, 2)` becomes `[B, C, A]`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), ItineraryError> {
        let len = self.selection.len();
        if from >= len {
            return Err(ItineraryError::out_of_range(from, len));
        }
        if to >= len {
            return Err(ItineraryError::out_of_range(to, len));
        }
        let point = self.selection.remove(from);
        self.selection.insert(to, point);
        Ok(())
    }

    /// Park the candidates in a side buffer and clear them.
    ///
    /// Hiding twice merges the current candidates into the existing buffer.
    pub fn hide_candidates(&mut self) {
        let current = std::mem::take(&mut self.candidates);
        let buffer = match self.hidden.take() {
            Some(existing) => merge_by_id(existing, current),
            None => current,
        };
        self.hidden = Some(buffer);
    }

    /// Restore hidden candidates, merging them with whatever was loaded in the
    /// meantime. On an id collision the restored entry wins. Ids that were
    /// selected while hidden stay out of the candidates.
    pub fn unhide_candidates(&mut self) {
        let Some(hidden) = self.hidden.take() else {
            return;
        };
        let restored: Vec<Point> = hidden
            .into_iter()
            .filter(|p| !self.is_selected(p.id()))
            .collect();
        let current = std::mem::take(&mut self.candidates);
        self.candidates = merge_by_id(current, restored);
    }

    /// Empty the selection, returning the removed entries
    pub fn clear_selection(&mut self, policy: ClearPolicy) -> Vec<Point> {
        let cleared = std::mem::take(&mut self.selection);
        if policy == ClearPolicy::Recycle {
            self.candidates = merge_by_id(std::mem::take(&mut self.candidates), cleared.clone());
        }
        cleared
    }
}

/// Key-based union of two point lists; entries of `later` replace entries of
/// `earlier` with the same id in place, new ids are appended.
fn merge_by_id(earlier: Vec<Point>, later: Vec<Point>) -> Vec<Point> {
    let mut merged = earlier;
    for point in later {
        match merged.iter_mut().find(|p| p.id() == point.id()) {
            Some(slot) => *slot = point,
            None => merged.push(point),
        }
    }
    merged
}
