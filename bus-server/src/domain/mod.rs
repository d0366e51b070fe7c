//! Domain types for the bus route planner.
//!
//! This module contains the core domain model types that represent
//! validated transit data. Identifiers enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod distance_unit;
mod error;
mod itinerary;
mod route;
mod stop;

pub use distance_unit::{DistanceUnit, EARTH_RADIUS_METERS};
pub use error::DomainError;
pub use itinerary::{ITINERARY_ID_SEPARATOR, Itinerary, Leg, StepKind, TransitStep};
pub use route::{InvalidRouteId, Route, RouteId, RouteInfo};
pub use stop::{Coordinates, InvalidStopId, LocalizedText, PlaceKey, Stop, StopId};
