//! Bus route planner.
//!
//! Answers "which buses take me from this stop to that one?" with direct
//! rides and journeys of up to two changes, ranked simplest first.

mod config;
mod network;
mod rank;
mod search;
mod segment;
mod transfer;

pub use config::{MAX_SUPPORTED_TRANSFERS, SearchConfig};
pub use network::{Network, NetworkError};
pub use rank::{compare, rank_itineraries, rank_refs};
pub use search::{Planner, Precondition, SearchError, SearchOutcome, SearchResult};
pub use segment::extract_segment;
pub use transfer::{PlaceIndex, TransferIndex, TransferPoint};
