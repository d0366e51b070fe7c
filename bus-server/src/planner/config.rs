//! Search configuration for the route planner.

use crate::domain::DistanceUnit;

use super::search::SearchError;

/// Most transfers the planner can search through.
pub const MAX_SUPPORTED_TRANSFERS: usize = 2;

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of itineraries to return.
    pub max_results: usize,

    /// Maximum number of bus changes allowed (0..=2).
    pub max_transfers: usize,

    /// Unit leg and itinerary distances are reported in.
    pub distance_unit: DistanceUnit,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_results: usize, max_transfers: usize, distance_unit: DistanceUnit) -> Self {
        Self {
            max_results,
            max_transfers,
            distance_unit,
        }
    }

    /// Returns a copy with a different result count.
    pub fn with_max_results(&self, max_results: usize) -> Self {
        Self {
            max_results,
            ..self.clone()
        }
    }

    /// Returns a copy reporting distances in `unit`.
    pub fn with_distance_unit(&self, distance_unit: DistanceUnit) -> Self {
        Self {
            distance_unit,
            ..self.clone()
        }
    }

    /// Check the configuration can drive a search.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_transfers > MAX_SUPPORTED_TRANSFERS {
            return Err(SearchError::InvalidRequest(format!(
                "at most {MAX_SUPPORTED_TRANSFERS} transfers are supported, got {}",
                self.max_transfers
            )));
        }

        if !self.distance_unit.is_length() {
            return Err(SearchError::InvalidRequest(format!(
                "{} is not a unit of length",
                self.distance_unit
            )));
        }

        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            max_transfers: MAX_SUPPORTED_TRANSFERS,
            distance_unit: DistanceUnit::Kilometers,
        }
    }
}
