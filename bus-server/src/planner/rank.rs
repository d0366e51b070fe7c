//! Itinerary ranking for search results.
//!
//! Ranks itineraries so the simplest rides come first.

use std::cmp::Ordering;

use crate::domain::Itinerary;

/// Preference order between two itineraries.
///
/// 1. Number of steps (fewer buses is better)
/// 2. Total stops across all legs (fewer is better)
///
/// Distance plays no part in the order.
pub fn compare(a: &Itinerary, b: &Itinerary) -> Ordering {
    a.step_count()
        .cmp(&b.step_count())
        .then_with(|| a.total_stops().cmp(&b.total_stops()))
}

/// Rank itineraries by preference, best first.
///
/// The sort is stable: equally ranked itineraries keep their discovery order.
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    itineraries.sort_by(compare);
    itineraries
}

/// Same as [`rank_itineraries`] over borrowed itineraries.
pub fn rank_refs(mut itineraries: Vec<&Itinerary>) -> Vec<&Itinerary> {
    itineraries.sort_by(|a, b| compare(a, b));
    itineraries
}
