//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from IO and HTTP errors.

use super::RouteId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,

    /// The same route appears in two legs of one itinerary
    #[error("route {0} is ridden more than once in one itinerary")]
    RepeatedRoute(RouteId),

    /// Distance unit name not recognised
    #[error("unknown distance unit: {0}")]
    UnknownDistanceUnit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::EmptyItinerary;
        assert_eq!(err.to_string(), "itinerary must have at least one leg");

        let err = DomainError::RepeatedRoute(RouteId::parse("36").unwrap());
        assert_eq!(
            err.to_string(),
            "route 36 is ridden more than once in one itinerary"
        );

        let err = DomainError::UnknownDistanceUnit("furlongs".into());
        assert_eq!(err.to_string(), "unknown distance unit: furlongs");
    }
}
