//! In-route segment extraction.
//!
//! Given a route's stop sequence and two sets of candidate stops, finds the
//! contiguous run of stops a rider travels between them.

use std::collections::HashSet;

use crate::domain::StopId;

/// Returns the part of `sequence` from the first stop in `from` up to and
/// including the first later stop in `to`.
///
/// Candidates are sets because one place can be several stop records
/// (directional siblings); any member matches. The result is empty when no
/// `from` stop appears, or no `to` stop appears after it.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use bus_server::domain::StopId;
/// use bus_server::planner::extract_segment;
///
/// let ids = |xs: &[u32]| xs.iter().map(|x| StopId::new(*x)).collect::<Vec<_>>();
/// let route = ids(&[1, 2, 3, 4, 5]);
/// let from: HashSet<_> = ids(&[2]).into_iter().collect();
/// let to: HashSet<_> = ids(&[4]).into_iter().collect();
///
/// assert_eq!(extract_segment(&from, &to, &route), &ids(&[2, 3, 4])[..]);
/// ```
pub fn extract_segment<'a>(
    from: &HashSet<StopId>,
    to: &HashSet<StopId>,
    sequence: &'a [StopId],
) -> &'a [StopId] {
    let Some(start) = sequence.iter().position(|s| from.contains(s)) else {
        return &[];
    };

    match sequence[start + 1..].iter().position(|s| to.contains(s)) {
        Some(offset) => &sequence[start..=start + 1 + offset],
        None => &[],
    }
}
