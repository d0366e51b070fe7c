//! Bounded transfer search.
//!
//! Finds itineraries between an origin and a destination stop-set using at
//! most two transfers: direct rides first, then one change of bus, then two.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::domain::{DomainError, Itinerary, Leg, Route, RouteId, StopId};
use crate::geometry::{self, GeometryError};

use super::config::SearchConfig;
use super::network::{Network, NetworkError};
use super::rank::{rank_itineraries, rank_refs};
use super::segment::extract_segment;

/// Error from route search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// Snapshot data is inconsistent
    #[error("inconsistent network data: {0}")]
    Network(#[from] NetworkError),

    /// Geometry could not be measured
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// An itinerary broke a domain invariant
    #[error("invalid itinerary: {0}")]
    Domain(#[from] DomainError),
}

/// Why a search was not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No origin candidates were set
    MissingOrigin,
    /// No destination candidates were set
    MissingDestination,
    /// None of the origin candidates is in the snapshot
    UnresolvedOrigin,
    /// None of the destination candidates is in the snapshot
    UnresolvedDestination,
}

/// Itineraries found by a completed search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Itineraries in the order they were found.
    discovered: Vec<Itinerary>,

    max_results: usize,

    /// Number of route combinations examined.
    pub combinations_explored: usize,
}

impl SearchResult {
    /// Itineraries in discovery order, before ranking.
    pub fn discovered(&self) -> &[Itinerary] {
        &self.discovered
    }

    /// Ranked itineraries, best first, truncated to the configured count.
    pub fn results(&self) -> Vec<&Itinerary> {
        let mut ranked = rank_refs(self.discovered.iter().collect());
        ranked.truncate(self.max_results);
        ranked
    }

    /// Owned form of [`SearchResult::results`].
    pub fn into_results(self) -> Vec<Itinerary> {
        let mut ranked = rank_itineraries(self.discovered);
        ranked.truncate(self.max_results);
        ranked
    }
}

/// Outcome of [`Planner::search`].
///
/// Distinguishes "nothing to search for" from "searched and found nothing".
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    NotSearched(Precondition),
    Searched(SearchResult),
}

impl SearchOutcome {
    /// The precondition that stopped the search, if any.
    pub fn precondition(&self) -> Option<Precondition> {
        match self {
            SearchOutcome::NotSearched(p) => Some(*p),
            SearchOutcome::Searched(_) => None,
        }
    }

    /// Ranked, truncated itineraries; empty when not searched.
    pub fn results(&self) -> Vec<&Itinerary> {
        match self {
            SearchOutcome::NotSearched(_) => Vec::new(),
            SearchOutcome::Searched(result) => result.results(),
        }
    }

    /// Owned form of [`SearchOutcome::results`].
    pub fn into_results(self) -> Vec<Itinerary> {
        match self {
            SearchOutcome::NotSearched(_) => Vec::new(),
            SearchOutcome::Searched(result) => result.into_results(),
        }
    }
}

/// Resolved endpoints of one search.
struct Endpoints<'n> {
    origin: HashSet<StopId>,
    destination: HashSet<StopId>,
    /// Routes serving the resolved origin stop.
    origin_routes: &'n [usize],
    /// Routes serving the resolved destination stop.
    destination_routes: &'n [usize],
}

/// Working state of one search. Owned by a single invocation.
struct Accumulator {
    itineraries: Vec<Itinerary>,
    keys: HashSet<String>,
    /// Routes already incorporated into some itinerary: direct routes and
    /// the first leg of each one-transfer itinerary.
    visited: HashSet<RouteId>,
    max_results: usize,
    explored: usize,
}

impl Accumulator {
    fn new(max_results: usize) -> Self {
        Self {
            itineraries: Vec::new(),
            keys: HashSet::new(),
            visited: HashSet::new(),
            max_results,
            explored: 0,
        }
    }

    fn is_full(&self) -> bool {
        self.itineraries.len() >= self.max_results
    }

    fn has_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn is_visited(&self, route: &Route) -> bool {
        self.visited.contains(route.id())
    }

    fn record(&mut self, itinerary: Itinerary) {
        trace!(id = itinerary.id(), distance = itinerary.distance(), "found itinerary");
        self.keys.insert(itinerary.id().to_string());
        self.itineraries.push(itinerary);
    }

    fn finish(self) -> SearchResult {
        SearchResult {
            discovered: self.itineraries,
            max_results: self.max_results,
            combinations_explored: self.explored,
        }
    }
}

/// Route planner over one network snapshot.
///
/// Endpoints are configured with [`Planner::set_origin`] and
/// [`Planner::set_destination`]; each call to [`Planner::search`] runs an
/// independent search with its own working state.
pub struct Planner<'a> {
    network: &'a Network,
    config: &'a SearchConfig,
    origin: Vec<StopId>,
    destination: Vec<StopId>,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(network: &'a Network, config: &'a SearchConfig) -> Self {
        Self {
            network,
            config,
            origin: Vec::new(),
            destination: Vec::new(),
        }
    }

    /// Set the stops a rider may board at, most preferred first.
    pub fn set_origin(&mut self, candidates: impl IntoIterator<Item = StopId>) {
        self.origin = candidates.into_iter().collect();
    }

    /// Set the stops a rider may alight at, most preferred first.
    pub fn set_destination(&mut self, candidates: impl IntoIterator<Item = StopId>) {
        self.destination = candidates.into_iter().collect();
    }

    /// Search for itineraries from origin to destination.
    pub fn search(&self) -> Result<SearchOutcome, SearchError> {
        self.config.validate()?;

        let endpoints = match self.resolve() {
            Ok(endpoints) => endpoints,
            Err(precondition) => {
                debug!(?precondition, "search not run");
                return Ok(SearchOutcome::NotSearched(precondition));
            }
        };

        let mut acc = Accumulator::new(self.config.max_results);

        if !acc.is_full() {
            self.direct_pass(&endpoints, &mut acc)?;
        }
        if !acc.is_full() && self.config.max_transfers >= 1 {
            self.one_transfer_pass(&endpoints, &mut acc)?;
        }
        if !acc.is_full() && self.config.max_transfers >= 2 {
            self.two_transfer_pass(&endpoints, &mut acc)?;
        }

        debug!(
            found = acc.itineraries.len(),
            explored = acc.explored,
            "search complete"
        );

        Ok(SearchOutcome::Searched(acc.finish()))
    }

    /// Find the transfer points for both endpoints.
    ///
    /// Each endpoint resolves to the first of its candidates that the
    /// snapshot knows about.
    fn resolve(&self) -> Result<Endpoints<'a>, Precondition> {
        if self.origin.is_empty() {
            return Err(Precondition::MissingOrigin);
        }
        if self.destination.is_empty() {
            return Err(Precondition::MissingDestination);
        }

        let network = self.network;
        let origin_point = self
            .origin
            .iter()
            .find_map(|id| network.transfer_point(id))
            .ok_or(Precondition::UnresolvedOrigin)?;
        let destination_point = self
            .destination
            .iter()
            .find_map(|id| network.transfer_point(id))
            .ok_or(Precondition::UnresolvedDestination)?;

        Ok(Endpoints {
            origin: self.origin.iter().copied().collect(),
            destination: self.destination.iter().copied().collect(),
            origin_routes: &origin_point.routes,
            destination_routes: &destination_point.routes,
        })
    }

    /// One route from origin to destination.
    fn direct_pass(&self, ends: &Endpoints<'_>, acc: &mut Accumulator) -> Result<(), SearchError> {
        for &idx in ends.origin_routes {
            let route = self.route(idx)?;
            acc.explored += 1;

            let Some(leg) = self.ride(route, &ends.origin, &ends.destination)? else {
                continue;
            };

            acc.visited.insert(route.id().clone());
            acc.record(Itinerary::new(vec![leg])?);

            if acc.is_full() {
                return Ok(());
            }
        }

        Ok(())
    }

    /// Origin route, change once, destination route.
    fn one_transfer_pass(
        &self,
        ends: &Endpoints<'_>,
        acc: &mut Accumulator,
    ) -> Result<(), SearchError> {
        for &from_idx in ends.origin_routes {
            let from_route = self.route(from_idx)?;

            for &to_idx in ends.destination_routes {
                if from_idx == to_idx {
                    continue;
                }
                let to_route = self.route(to_idx)?;

                if acc.is_visited(from_route) || acc.is_visited(to_route) {
                    continue;
                }
                acc.explored += 1;

                let key = Itinerary::key([from_route.id(), to_route.id()]);
                if acc.has_key(&key) {
                    continue;
                }

                // Last shared stop that is not itself an endpoint
                let Some(transfer) = from_route
                    .common_stops(to_route)
                    .into_iter()
                    .rev()
                    .find(|s| !ends.origin.contains(s) && !ends.destination.contains(s))
                else {
                    continue;
                };
                let transfer_place = self.network.place_set(&transfer);

                let Some(first) = self.ride(from_route, &ends.origin, &transfer_place)? else {
                    continue;
                };
                let Some(second) = self.ride(to_route, &transfer_place, &ends.destination)? else {
                    continue;
                };

                acc.record(Itinerary::new(vec![first, second])?);
                acc.visited.insert(from_route.id().clone());

                if acc.is_full() {
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    /// Origin route, join route, destination route.
    fn two_transfer_pass(
        &self,
        ends: &Endpoints<'_>,
        acc: &mut Accumulator,
    ) -> Result<(), SearchError> {
        for &from_idx in ends.origin_routes {
            let from_route = self.route(from_idx)?;

            for &to_idx in ends.destination_routes {
                if from_idx == to_idx {
                    continue;
                }
                let to_route = self.route(to_idx)?;

                for (join_idx, join_route) in self.network.routes().iter().enumerate() {
                    if join_idx == from_idx || join_idx == to_idx || acc.is_visited(join_route) {
                        continue;
                    }
                    acc.explored += 1;

                    let key = Itinerary::key([from_route.id(), join_route.id(), to_route.id()]);
                    if acc.has_key(&key) {
                        continue;
                    }

                    let Some(&board_join) = from_route.common_stops(join_route).last() else {
                        continue;
                    };
                    let Some(&leave_join) = to_route.common_stops(join_route).last() else {
                        continue;
                    };
                    let board_place = self.network.place_set(&board_join);
                    let leave_place = self.network.place_set(&leave_join);

                    let Some(first) = self.ride(from_route, &ends.origin, &board_place)? else {
                        continue;
                    };
                    let Some(second) = self.ride(join_route, &board_place, &leave_place)? else {
                        continue;
                    };
                    let Some(third) = self.ride(to_route, &leave_place, &ends.destination)? else {
                        continue;
                    };

                    acc.record(Itinerary::new(vec![first, second, third])?);

                    if acc.is_full() {
                        return Ok(());
                    }
                }
            }
        }

        Ok(())
    }

    /// The leg ridden on `route` between two stop-sets, if the route goes
    /// from one to the other.
    ///
    /// The leg's path is the route polyline cut between the boarding and
    /// alighting stops. Routes without a usable polyline fall back to the
    /// straight path through their stops.
    fn ride(
        &self,
        route: &Route,
        from: &HashSet<StopId>,
        to: &HashSet<StopId>,
    ) -> Result<Option<Leg>, SearchError> {
        let segment = extract_segment(from, to, &route.stops);
        let (Some(board), Some(alight)) = (segment.first(), segment.last()) else {
            return Ok(None);
        };

        let path = if route.coordinates.len() >= 2 {
            let start = self.stop_position(route, board)?;
            let end = self.stop_position(route, alight)?;
            geometry::line_slice(start, end, &geometry::line_string(&route.coordinates))
        } else {
            let positions = segment
                .iter()
                .map(|id| self.network.stop(id).map(|s| s.position()))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| unknown_stop(route, board))?;
            geometry::line_string(&positions)
        };

        let distance = geometry::length(&path, self.config.distance_unit)?;
        let trimmed = Route::new(
            route.info.clone(),
            segment.to_vec(),
            geometry::to_coordinates(&path),
        );

        Ok(Some(Leg::new(trimmed, distance)))
    }

    fn route(&self, idx: usize) -> Result<&'a Route, SearchError> {
        self.network
            .route_at(idx)
            .ok_or(SearchError::Network(NetworkError::MissingRoute(idx)))
    }

    fn stop_position(&self, route: &Route, id: &StopId) -> Result<geo::Point<f64>, SearchError> {
        self.network
            .stop(id)
            .map(|stop| geometry::point(stop.position()))
            .ok_or_else(|| unknown_stop(route, id))
    }
}

fn unknown_stop(route: &Route, stop: &StopId) -> SearchError {
    SearchError::Network(NetworkError::UnknownStop {
        route: route.id().clone(),
        stop: *stop,
    })
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
