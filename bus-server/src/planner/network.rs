//! Validated network snapshot.
//!
//! A `Network` owns one snapshot of stops and routes together with the
//! indexes derived from it. It is immutable after construction and is shared
//! between concurrent searches behind an `Arc`.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{Route, RouteId, Stop, StopId};

use super::transfer::{PlaceIndex, TransferIndex, TransferPoint};

/// Inconsistencies in snapshot data.
///
/// These indicate corrupted input rather than a user mistake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// Two stop records share an id
    #[error("duplicate stop id {0} in snapshot")]
    DuplicateStop(StopId),

    /// Two route records share an id
    #[error("duplicate route id {0} in snapshot")]
    DuplicateRoute(RouteId),

    /// A route calls at a stop the snapshot does not contain
    #[error("route {route} references unknown stop {stop}")]
    UnknownStop { route: RouteId, stop: StopId },

    /// A transfer point names a route position the snapshot does not have
    #[error("transfer index references missing route at position {0}")]
    MissingRoute(usize),
}

/// Stops, routes and their indexes.
#[derive(Debug, Clone)]
pub struct Network {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    stop_lookup: HashMap<StopId, usize>,
    route_lookup: HashMap<RouteId, usize>,
    transfers: TransferIndex,
    places: PlaceIndex,
}

impl Network {
    /// Validate a snapshot and build its indexes.
    ///
    /// # Errors
    ///
    /// Returns `Err` on duplicate stop or route ids, or a route calling at a
    /// stop that is not in `stops`.
    pub fn new(stops: Vec<Stop>, routes: Vec<Route>) -> Result<Self, NetworkError> {
        let mut stop_lookup = HashMap::with_capacity(stops.len());
        for (idx, stop) in stops.iter().enumerate() {
            if stop_lookup.insert(stop.id, idx).is_some() {
                return Err(NetworkError::DuplicateStop(stop.id));
            }
        }

        let mut route_lookup = HashMap::with_capacity(routes.len());
        for (idx, route) in routes.iter().enumerate() {
            if route_lookup.insert(route.id().clone(), idx).is_some() {
                return Err(NetworkError::DuplicateRoute(route.id().clone()));
            }
            if let Some(stop) = route.stops.iter().find(|s| !stop_lookup.contains_key(s)) {
                return Err(NetworkError::UnknownStop {
                    route: route.id().clone(),
                    stop: *stop,
                });
            }
        }

        let transfers = TransferIndex::build(&stops, &routes);
        let places = PlaceIndex::build(&stops);

        debug!(
            stops = stops.len(),
            routes = routes.len(),
            transfer_points = transfers.len(),
            places = places.place_count(),
            "built network snapshot"
        );

        Ok(Self {
            stops,
            routes,
            stop_lookup,
            route_lookup,
            transfers,
            places,
        })
    }

    /// All stops, in snapshot order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// All routes, in snapshot order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stop_lookup.get(id).map(|idx| &self.stops[*idx])
    }

    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.route_lookup.get(id).map(|idx| &self.routes[*idx])
    }

    /// Route by its position in the snapshot, as stored in transfer points.
    pub fn route_at(&self, idx: usize) -> Option<&Route> {
        self.routes.get(idx)
    }

    pub fn transfer_point(&self, stop: &StopId) -> Option<&TransferPoint> {
        self.transfers.get(stop)
    }

    pub fn transfers(&self) -> &TransferIndex {
        &self.transfers
    }

    /// Every stop at the same place as `id`, with `id` first.
    ///
    /// Returns an empty list for an unknown stop.
    pub fn place_of(&self, id: &StopId) -> Vec<StopId> {
        let Some(stop) = self.stop(id) else {
            return Vec::new();
        };

        let mut place = vec![*id];
        place.extend(self.places.siblings(stop).iter().filter(|s| *s != id));
        place
    }

    /// Same as [`Network::place_of`], as a set.
    pub fn place_set(&self, id: &StopId) -> HashSet<StopId> {
        self.place_of(id).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocalizedText, RouteInfo};

    fn stop(id: u32, name: &str) -> Stop {
        Stop {
            id: StopId::new(id),
            name: LocalizedText::new(name, ""),
            road: LocalizedText::default(),
            township: LocalizedText::default(),
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
    fn builds_lookups_and_indexes() {
        let network = Network::new(
            vec![stop(1, "A"), stop(2, "B"), stop(3, "A")],
            vec![route("R1", &[1, 2]), route("R2", &[2, 3])],
        )
        .unwrap();

        assert_eq!(network.stops().len(), 3);
        assert_eq!(network.stop(&StopId::new(2)).unwrap().name.en, "B");
        assert_eq!(
            network.route(&RouteId::parse("R2").unwrap()).unwrap().stops.len(),
            2
        );
        assert_eq!(network.route_at(0).unwrap().id().as_str(), "R1");
        assert!(network.route_at(5).is_none());
        assert_eq!(network.transfers().routes_at(&StopId::new(2)), &[0, 1]);
    }

    #[test]
    fn place_of_puts_requested_stop_first() {
        let network = Network::new(
            vec![stop(1, "A"), stop(2, "B"), stop(3, "A")],
            Vec::new(),
        )
        .unwrap();

        assert_eq!(
            network.place_of(&StopId::new(3)),
            vec![StopId::new(3), StopId::new(1)]
        );
        assert_eq!(network.place_of(&StopId::new(2)), vec![StopId::new(2)]);
        assert!(network.place_of(&StopId::new(9)).is_empty());
        assert_eq!(network.place_set(&StopId::new(1)).len(), 2);
    }

    #[test]
    fn reject_duplicate_stop() {
        let err = Network::new(vec![stop(1, "A"), stop(1, "B")], Vec::new()).unwrap_err();
        assert_eq!(err, NetworkError::DuplicateStop(StopId::new(1)));
        assert_eq!(err.to_string(), "duplicate stop id 1 in snapshot");
    }

    #[test]
    fn reject_duplicate_route() {
        let err = Network::new(
            vec![stop(1, "A")],
            vec![route("R1", &[1]), route("R1", &[1])],
        )
        .unwrap_err();
        assert!(matches!(err, NetworkError::DuplicateRoute(id) if id.as_str() == "R1"));
    }

    #[test]
    fn reject_unknown_stop() {
        let err = Network::new(vec![stop(1, "A")], vec![route("R1", &[1, 7])]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "route R1 references unknown stop 7"
        );
    }

    #[test]
    fn missing_route_message() {
        assert_eq!(
            NetworkError::MissingRoute(4).to_string(),
            "transfer index references missing route at position 4"
        );
    }
}
