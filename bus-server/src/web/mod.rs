//! Web layer for the bus route planner.
//!
//! Provides HTTP endpoints for looking up stops and routes and for planning
//! itineraries. Every response is wrapped in a `{status, data}` envelope.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
