//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::SnapshotCache;
use crate::planner::SearchConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached stop and route snapshot
    pub snapshots: Arc<SnapshotCache>,

    /// Defaults for route search; requests override count and unit
    pub search: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(snapshots: SnapshotCache, search: SearchConfig) -> Self {
        Self {
            snapshots: Arc::new(snapshots),
            search: Arc::new(search),
        }
    }
}
