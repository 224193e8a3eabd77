//! Itinerary state: candidate points and the ordered selection
//!
//! Candidates are the points fetched for the current title that the user has
//! not picked yet. The selection is the itinerary itself; its order drives
//! marker numbering and the map legend.

pub mod error;
pub mod state;

pub use error::ItineraryError;
pub use state::{ClearPolicy, Itinerary};
