//! Stop and route data.
//!
//! Loads snapshots of stops and routes from JSON files or URLs and answers
//! lookups against them.

mod error;
mod query;
mod source;
mod transit;

pub use error::{QueryError, StoreError};
pub use query::{NEAREST_DEFAULT_COUNT, NEAREST_MAX_COUNT, RouteQuery, StopQuery};
pub use source::{SnapshotLoader, Source};
pub use transit::{NearbyStop, TransitStore};

#[cfg(test)]
pub(crate) use source::fixtures;
