//! Bus route types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Coordinates, LocalizedText, StopId};

/// Error returned when parsing an invalid route id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route id: {reason}")]
pub struct InvalidRouteId {
    reason: &'static str,
}

/// Identity of a bus route, unique within a snapshot.
///
/// # Examples
///
/// ```
/// use bus_server::domain::RouteId;
///
/// let id = RouteId::parse("YBS-36").unwrap();
/// assert_eq!(id.as_str(), "YBS-36");
///
/// assert!(RouteId::parse("").is_err());
/// assert!(RouteId::parse("--").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteId(String);

impl RouteId {
    /// Parse a route id.
    ///
    /// The id must contain at least one alphanumeric or underscore character.
    pub fn parse(s: &str) -> Result<Self, InvalidRouteId> {
        let s = s.trim();
        if s.is_empty() {
            return Err(InvalidRouteId {
                reason: "must not be empty",
            });
        }
        if !s.chars().any(|c| c.is_alphanumeric() || c == '_') {
            return Err(InvalidRouteId {
                reason: "must contain a word character",
            });
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RouteId {
    type Error = InvalidRouteId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<RouteId> for String {
    fn from(id: RouteId) -> Self {
        id.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Route metadata: everything about a route except its stop and
/// coordinate sequences.
///
/// Unknown fields in the source record (fare class, operator, ...) are kept
/// in `extra` so they survive into itinerary steps unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub route_id: RouteId,

    #[serde(default)]
    pub name: LocalizedText,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteInfo {
    pub fn new(route_id: RouteId) -> Self {
        Self {
            route_id,
            name: LocalizedText::default(),
            color: None,
            extra: Map::new(),
        }
    }
}

/// A bus line: ordered stops in travel order plus its physical path.
///
/// `coordinates` is the polyline the bus drives along; it usually has many
/// more points than there are stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(flatten)]
    pub info: RouteInfo,

    pub stops: Vec<StopId>,

    #[serde(default)]
    pub coordinates: Vec<Coordinates>,
}

impl Route {
    pub fn new(info: RouteInfo, stops: Vec<StopId>, coordinates: Vec<Coordinates>) -> Self {
        Self {
            info,
            stops,
            coordinates,
        }
    }

    pub fn id(&self) -> &RouteId {
        &self.info.route_id
    }

    /// True if the route calls at the given stop.
    pub fn serves(&self, stop: StopId) -> bool {
        self.stops.contains(&stop)
    }

    /// Stops shared with another route, in this route's order.
    pub fn common_stops(&self, other: &Route) -> Vec<StopId> {
        self.stops
            .iter()
            .copied()
            .filter(|s| other.serves(*s))
            .collect()
    }
}
