//! Transfer and place indexes over a network snapshot.
//!
//! The transfer index answers "which routes call at this stop?" and the
//! place index answers "which stop records are the same place as this one?".
//! Both are built once per snapshot and shared by every search against it.

use std::collections::HashMap;

use crate::domain::{PlaceKey, Route, Stop, StopId};

/// A stop annotated with every route that serves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPoint {
    pub stop: StopId,
    /// Indexes into the snapshot's route list, in route order.
    pub routes: Vec<usize>,
}

/// Map from stop to the routes serving it.
///
/// Every stop in the snapshot has an entry, including stops no route serves.
#[derive(Debug, Clone, Default)]
pub struct TransferIndex {
    points: HashMap<StopId, TransferPoint>,
}

impl TransferIndex {
    /// Build the index for a snapshot.
    pub fn build(stops: &[Stop], routes: &[Route]) -> Self {
        let mut points: HashMap<StopId, TransferPoint> = stops
            .iter()
            .map(|stop| {
                (
                    stop.id,
                    TransferPoint {
                        stop: stop.id,
                        routes: Vec::new(),
                    },
                )
            })
            .collect();

        for (idx, route) in routes.iter().enumerate() {
            for stop in &route.stops {
                if let Some(point) = points.get_mut(stop) {
                    // A route calling twice at one stop is listed once
                    if point.routes.last() != Some(&idx) {
                        point.routes.push(idx);
                    }
                }
            }
        }

        Self { points }
    }

    /// Get the transfer point for a stop.
    pub fn get(&self, stop: &StopId) -> Option<&TransferPoint> {
        self.points.get(stop)
    }

    /// Route indexes serving a stop; empty for unknown or unserved stops.
    pub fn routes_at(&self, stop: &StopId) -> &[usize] {
        self.points
            .get(stop)
            .map(|p| p.routes.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the number of stops in the index.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the index has no stops.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Groups stop records that represent the same place.
///
/// Bus stops on opposite sides of a road share a name, road and township but
/// have distinct ids. Keyed by the English labels.
#[derive(Debug, Clone, Default)]
pub struct PlaceIndex {
    places: HashMap<PlaceKey, Vec<StopId>>,
}

impl PlaceIndex {
    /// Build the index for a snapshot. Siblings keep snapshot order.
    pub fn build(stops: &[Stop]) -> Self {
        let mut places: HashMap<PlaceKey, Vec<StopId>> = HashMap::new();
        for stop in stops {
            places.entry(stop.place_key()).or_default().push(stop.id);
        }
        Self { places }
    }

    /// Every stop sharing `stop`'s place, including `stop` itself.
    pub fn siblings(&self, stop: &Stop) -> &[StopId] {
        self.places
            .get(&stop.place_key())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the number of distinct places.
    pub fn place_count(&self) -> usize {
        self.places.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocalizedText, RouteId, RouteInfo};

    fn stop(id: u32, name: &str) -> Stop {
        Stop {
            id: StopId::new(id),
            name: LocalizedText::new(name, ""),
            road: LocalizedText::new("Main Rd", ""),
            township: LocalizedText::new("Downtown", ""),
            lat: 16.8,
            lng: 96.1,
        }
    }

    fn route(id: &str, stops: &[u32]) -> Route {
        Route::new(
            RouteInfo::new(RouteId::parse(id).unwrap()),
            stops.iter().map(|s| StopId::new(*s)).collect(),
            Vec::new(),
        )
    }

    #[test]
    fn every_stop_has_an_entry() {
        let stops = vec![stop(1, "A"), stop(2, "B"), stop(3, "C")];
        let routes = vec![route("R1", &[1, 2])];

        let index = TransferIndex::build(&stops, &routes);

        assert_eq!(index.len(), 3);
        assert_eq!(index.routes_at(&StopId::new(1)), &[0]);
        assert!(index.get(&StopId::new(3)).unwrap().routes.is_empty());
        assert!(index.routes_at(&StopId::new(99)).is_empty());
    }

    #[test]
    fn routes_keep_input_order() {
        let stops = vec![stop(1, "A"), stop(2, "B")];
        let routes = vec![route("R1", &[2]), route("R2", &[1]), route("R3", &[2, 1])];

        let index = TransferIndex::build(&stops, &routes);

        assert_eq!(index.routes_at(&StopId::new(2)), &[0, 2]);
        assert_eq!(index.routes_at(&StopId::new(1)), &[1, 2]);
    }

    #[test]
    fn loop_route_listed_once() {
        let stops = vec![stop(1, "A"), stop(2, "B")];
        let routes = vec![route("Circle", &[1, 2, 1])];

        let index = TransferIndex::build(&stops, &routes);

        assert_eq!(index.routes_at(&StopId::new(1)), &[0]);
    }

    #[test]
    fn place_index_groups_siblings() {
        let stops = vec![stop(1, "Hledan"), stop(2, "Sule"), stop(3, "Hledan")];
        let places = PlaceIndex::build(&stops);

        assert_eq!(places.place_count(), 2);
        assert_eq!(
            places.siblings(&stops[0]),
            &[StopId::new(1), StopId::new(3)]
        );
        assert_eq!(places.siblings(&stops[1]), &[StopId::new(2)]);
    }

    #[test]
    fn unknown_place_has_no_siblings() {
        let places = PlaceIndex::build(&[stop(1, "A")]);
        assert!(places.siblings(&stop(9, "Z")).is_empty());
    }
}
