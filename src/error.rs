//! Top-level error type for planner sessions and the command line tool

use thiserror::Error;

use crate::config::ConfigError;
use crate::itinerary::ItineraryError;
use crate::map::MapError;
use crate::services::FetchError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Itinerary(#[from] ItineraryError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Service error: {0}")]
    Fetch(#[from] FetchError),

    #[error("State error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("No point with id '{id}' among the candidates")]
    UnknownPoint { id: String },

    #[error("No entry #{position} in a selection of {len}")]
    InvalidPosition { position: usize, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_itinerary_errors_are_transparent() {
        let err: PlannerError = ItineraryError::out_of_range(3, 1).into();
        assert_eq!(err.to_string(), "index 3 out of range for selection of length 1");
    }

    #[test]
    fn test_map_error_is_prefixed() {
        let err: PlannerError = MapError::InvalidViewport {
            width: 0.0,
            height: 10.0,
        }
        .into();
        assert_eq!(err.to_string(), "Map error: invalid viewport 0x10");
    }
}
