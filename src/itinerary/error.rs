//! Error types for itinerary mutations

use thiserror::Error;

/// Errors that can occur while mutating an itinerary
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItineraryError {
    /// A selection index that does not exist (usually a stale index held by the caller)
    #[error("index {index} out of range for selection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A point id that is not part of the selection
    #[error("point '{id}' is not in the selection")]
    NotSelected { id: String },
}

impl ItineraryError {
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = ItineraryError::out_of_range(5, 3);
        assert_eq!(err.to_string(), "index 5 out of range for selection of length 3");
    }
}
