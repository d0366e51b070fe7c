//! Itinerary types.
//!
//! An `Itinerary` is one complete journey from origin to destination made
//! of one to three legs, each an uninterrupted ride on a single route.

use std::collections::HashSet;

use serde::Serialize;

use super::{DomainError, Route, RouteId, RouteInfo};

/// Separator between route ids in an itinerary id.
pub const ITINERARY_ID_SEPARATOR: &str = " - ";

/// Kind of a traversed step. Only bus rides exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Transit,
}

/// One traversed leg as reported to callers: the route's metadata and the
/// distance ridden on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub step: RouteInfo,
    pub distance: f64,
}

/// A ride on one route, trimmed to the stops and path actually travelled.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub route: Route,
    pub distance: f64,
}

impl Leg {
    pub fn new(route: Route, distance: f64) -> Self {
        Self { route, distance }
    }
}

/// A complete journey from origin to destination.
///
/// # Invariants
///
/// - At least one leg
/// - No route is ridden twice
/// - `distance` is the sum of the step distances
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    id: String,
    routes: Vec<Route>,
    transit_steps: Vec<TransitStep>,
    distance: f64,
}

impl Itinerary {
    /// Builds an itinerary from its legs in travel order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `legs` is empty or a route appears in more than one leg.
    pub fn new(legs: Vec<Leg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        let mut seen = HashSet::new();
        for leg in &legs {
            if !seen.insert(leg.route.id()) {
                return Err(DomainError::RepeatedRoute(leg.route.id().clone()));
            }
        }

        let id = Self::key(legs.iter().map(|leg| leg.route.id()));
        let distance = legs.iter().map(|leg| leg.distance).sum();

        let (routes, transit_steps): (Vec<Route>, Vec<TransitStep>) = legs
            .into_iter()
            .map(|leg| {
                let step = TransitStep {
                    kind: StepKind::Transit,
                    step: leg.route.info.clone(),
                    distance: leg.distance,
                };
                (leg.route, step)
            })
            .unzip();

        Ok(Self {
            id,
            routes,
            transit_steps,
            distance,
        })
    }

    /// The id an itinerary riding these routes in this order would have.
    pub fn key<'a>(route_ids: impl IntoIterator<Item = &'a RouteId>) -> String {
        route_ids
            .into_iter()
            .map(RouteId::as_str)
            .collect::<Vec<_>>()
            .join(ITINERARY_ID_SEPARATOR)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The trimmed route of each leg, in travel order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn steps(&self) -> &[TransitStep] {
        &self.transit_steps
    }

    /// Total distance in the unit the search was run with.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn step_count(&self) -> usize {
        self.transit_steps.len()
    }

    /// Number of times the rider changes bus.
    pub fn transfer_count(&self) -> usize {
        self.step_count().saturating_sub(1)
    }

    /// Stops across all legs. A transfer stop counts once per leg it ends or
    /// starts.
    pub fn total_stops(&self) -> usize {
        self.routes.iter().map(|r| r.stops.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopId;

    fn leg(id: &str, stops: &[u32], distance: f64) -> Leg {
        let mut info = RouteInfo::new(RouteId::parse(id).unwrap());
        info.extra.insert("fare".into(), "200".into());
        Leg::new(
            Route::new(
                info,
                stops.iter().map(|s| StopId::new(*s)).collect(),
                Vec::new(),
            ),
            distance,
        )
    }

    #[test]
    fn single_leg_itinerary() {
        let itinerary = Itinerary::new(vec![leg("36", &[1, 2, 3], 2.5)]).unwrap();

        assert_eq!(itinerary.id(), "36");
        assert_eq!(itinerary.step_count(), 1);
        assert_eq!(itinerary.transfer_count(), 0);
        assert_eq!(itinerary.total_stops(), 3);
        assert_eq!(itinerary.distance(), 2.5);
        assert_eq!(itinerary.steps()[0].kind, StepKind::Transit);
    }

    #[test]
    fn multi_leg_itinerary_sums_distance() {
        let itinerary = Itinerary::new(vec![
            leg("A", &[1, 2, 5], 1.25),
            leg("J", &[5, 6], 0.5),
            leg("B", &[6, 9], 2.0),
        ])
        .unwrap();

        assert_eq!(itinerary.id(), "A - J - B");
        assert_eq!(itinerary.transfer_count(), 2);
        assert_eq!(itinerary.total_stops(), 7);
        let sum: f64 = itinerary.steps().iter().map(|s| s.distance).sum();
        assert!((itinerary.distance() - sum).abs() < 1e-12);
    }

    #[test]
    fn reject_empty_itinerary() {
        assert!(matches!(
            Itinerary::new(Vec::new()),
            Err(DomainError::EmptyItinerary)
        ));
    }

    #[test]
    fn reject_repeated_route() {
        let result = Itinerary::new(vec![leg("A", &[1, 2], 1.0), leg("A", &[2, 3], 1.0)]);
        assert!(matches!(result, Err(DomainError::RepeatedRoute(id)) if id.as_str() == "A"));
    }

    #[test]
    fn serializes_in_wire_shape() {
        let itinerary =
            Itinerary::new(vec![leg("A", &[1, 2], 1.0), leg("B", &[2, 3], 2.0)]).unwrap();
        let json = serde_json::to_value(&itinerary).unwrap();

        assert_eq!(json["id"], "A - B");
        assert_eq!(json["distance"], 3.0);
        assert_eq!(json["routes"][1]["stops"], serde_json::json!([2, 3]));
        assert_eq!(json["transitSteps"][0]["type"], "transit");
        assert_eq!(json["transitSteps"][0]["step"]["route_id"], "A");
        assert_eq!(json["transitSteps"][0]["step"]["fare"], "200");
        assert!(json["transitSteps"][0]["step"].get("stops").is_none());
    }

    #[test]
    fn key_joins_route_ids() {
        let a = RouteId::parse("1").unwrap();
        let b = RouteId::parse("2").unwrap();
        assert_eq!(Itinerary::key([&a, &b]), "1 - 2");
        assert_eq!(Itinerary::key(std::iter::empty::<&RouteId>()), "");
    }
}
