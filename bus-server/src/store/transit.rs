//! In-memory transit store.

use crate::domain::{Coordinates, DistanceUnit, Route, RouteId, Stop, StopId};
use crate::geometry;
use crate::planner::Network;

use super::error::{QueryError, StoreError};
use super::query::{NEAREST_MAX_COUNT, RouteQuery, StopQuery};

/// A stop paired with its distance from a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyStop<'a> {
    pub stop: &'a Stop,
    /// Distance in the unit the lookup asked for.
    pub distance: f64,
}

/// One loaded snapshot and the lookups served from it.
#[derive(Debug, Clone)]
pub struct TransitStore {
    network: Network,
}

impl TransitStore {
    /// Validate records and build the store.
    pub fn new(stops: Vec<Stop>, routes: Vec<Route>) -> Result<Self, StoreError> {
        Ok(Self {
            network: Network::new(stops, routes)?,
        })
    }

    /// The planner view of this snapshot.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Stops matching `query`, in id order.
    pub fn search_stops(&self, query: &StopQuery) -> Vec<&Stop> {
        let mut stops: Vec<&Stop> = self
            .network
            .stops()
            .iter()
            .filter(|s| query.matches(s))
            .collect();
        stops.sort_by_key(|s| s.id);
        stops
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.network.stop(&id)
    }

    /// Routes matching `query`, in route id order.
    pub fn search_routes(&self, query: &RouteQuery) -> Vec<&Route> {
        let mut routes: Vec<&Route> = self
            .network
            .routes()
            .iter()
            .filter(|r| query.matches(r))
            .collect();
        routes.sort_by(|a, b| a.id().cmp(b.id()));
        routes
    }

    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.network.route(id)
    }

    /// The `count` stops closest to `at`, nearest first.
    pub fn nearest_stops(
        &self,
        at: Coordinates,
        count: usize,
        unit: DistanceUnit,
    ) -> Result<Vec<NearbyStop<'_>>, QueryError> {
        if !at.is_valid() {
            return Err(QueryError::InvalidCoordinates(format!(
                "lat {} lng {}",
                at.lat, at.lng
            )));
        }
        if !(1..=NEAREST_MAX_COUNT).contains(&count) {
            return Err(QueryError::CountOutOfRange {
                count,
                max: NEAREST_MAX_COUNT,
            });
        }

        let origin = geometry::point(at);
        let mut nearby = self
            .network
            .stops()
            .iter()
            .map(|stop| {
                let distance = geometry::distance(origin, geometry::point(stop.position()), unit)?;
                Ok(NearbyStop { stop, distance })
            })
            .collect::<Result<Vec<_>, QueryError>>()?;

        nearby.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        nearby.truncate(count);
        Ok(nearby)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::source::fixtures;

    fn store() -> TransitStore {
        let stops: Vec<Stop> = serde_json::from_str(fixtures::STOPS).unwrap();
        let routes: Vec<Route> = serde_json::from_str(fixtures::ROUTES).unwrap();
        TransitStore::new(stops, routes).unwrap()
    }

    fn stop_ids(stops: &[&Stop]) -> Vec<u32> {
        stops.iter().map(|s| s.id.get()).collect()
    }

    #[test]
    fn search_stops_by_name() {
        let store = store();
        let query = StopQuery {
            name: Some("hledan".into()),
            ..StopQuery::default()
        };

        assert_eq!(stop_ids(&store.search_stops(&query)), vec![1, 4]);
        assert_eq!(store.search_stops(&StopQuery::default()).len(), 5);
    }

    #[test]
    fn search_stops_by_road_and_township() {
        let store = store();
        let query = StopQuery {
            road: Some("pyay".into()),
            township: Some("sanchaung".into()),
            ..StopQuery::default()
        };

        assert_eq!(stop_ids(&store.search_stops(&query)), vec![2]);
    }

    #[test]
    fn search_routes_sorted_by_id() {
        let store = store();

        let all: Vec<&str> = store
            .search_routes(&RouteQuery::default())
            .iter()
            .map(|r| r.id().as_str())
            .collect();
        assert_eq!(all, vec!["21", "36", "61"]);

        let some = store.search_routes(&RouteQuery {
            id: Some("6".into()),
        });
        assert_eq!(some.len(), 2);
    }

    #[test]
    fn lookup_by_id() {
        let store = store();

        assert_eq!(store.stop(StopId::new(5)).unwrap().name.en, "Thingangyun");
        assert!(store.stop(StopId::new(42)).is_none());
        assert!(store.route(&RouteId::parse("61").unwrap()).is_some());
        assert!(store.route(&RouteId::parse("99").unwrap()).is_none());
    }

    #[test]
    fn nearest_stops_are_ordered_by_distance() {
        let store = store();

        let nearby = store
            .nearest_stops(Coordinates::new(16.776, 96.158), 3, DistanceUnit::Meters)
            .unwrap();

        assert_eq!(nearby.len(), 3);
        assert_eq!(nearby[0].stop.id, StopId::new(3));
        assert!(nearby[0].distance < 200.0);
        assert!(nearby.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn nearest_stops_validate_input() {
        let store = store();
        let here = Coordinates::new(16.8, 96.1);

        assert!(matches!(
            store.nearest_stops(Coordinates::new(95.0, 0.0), 3, DistanceUnit::Meters),
            Err(QueryError::InvalidCoordinates(_))
        ));
        assert_eq!(
            store.nearest_stops(here, 0, DistanceUnit::Meters).unwrap_err(),
            QueryError::CountOutOfRange { count: 0, max: 100 }
        );
        assert!(store.nearest_stops(here, 101, DistanceUnit::Meters).is_err());
        assert!(matches!(
            store.nearest_stops(here, 3, DistanceUnit::Acres),
            Err(QueryError::Geometry(_))
        ));
    }

    #[test]
    fn nearest_count_larger_than_store() {
        let store = store();
        let nearby = store
            .nearest_stops(Coordinates::new(16.8, 96.1), 100, DistanceUnit::Kilometers)
            .unwrap();
        assert_eq!(nearby.len(), 5);
    }
}
