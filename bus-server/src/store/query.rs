//! Stop and route lookup filters.

use crate::domain::{Route, Stop};

/// Default number of stops returned by a nearest-stop lookup.
pub const NEAREST_DEFAULT_COUNT: usize = 10;

/// Largest number of stops a nearest-stop lookup may return.
pub const NEAREST_MAX_COUNT: usize = 100;

/// Filter for stop searches.
///
/// Each given field must appear, case-insensitively, in the English or
/// Myanmar label of the matching field. Empty fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopQuery {
    pub name: Option<String>,
    pub road: Option<String>,
    pub township: Option<String>,
}

impl StopQuery {
    pub fn matches(&self, stop: &Stop) -> bool {
        field_matches(&self.name, |n| stop.name.contains_ignore_case(n))
            && field_matches(&self.road, |r| stop.road.contains_ignore_case(r))
            && field_matches(&self.township, |t| stop.township.contains_ignore_case(t))
    }
}

/// Filter for route searches: a case-insensitive fragment of the route id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteQuery {
    pub id: Option<String>,
}

impl RouteQuery {
    pub fn matches(&self, route: &Route) -> bool {
        field_matches(&self.id, |id| {
            route
                .id()
                .as_str()
                .to_lowercase()
                .contains(&id.to_lowercase())
        })
    }
}

fn field_matches(value: &Option<String>, test: impl Fn(&str) -> bool) -> bool {
    match value.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(v) => test(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocalizedText, RouteId, RouteInfo, StopId};

    fn stop() -> Stop {
        Stop {
            id: StopId::new(1),
            name: LocalizedText::new("Hledan", "လှည်းတန်း"),
            road: LocalizedText::new("Insein Rd", ""),
            township: LocalizedText::new("Kamayut", ""),
            lat: 16.823,
            lng: 96.129,
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(StopQuery::default().matches(&stop()));
        let blank = StopQuery {
            name: Some("  ".into()),
            ..StopQuery::default()
        };
        assert!(blank.matches(&stop()));
    }

    #[test]
    fn every_given_field_must_match() {
        let query = StopQuery {
            name: Some("hle".into()),
            township: Some("KAMAYUT".into()),
            ..StopQuery::default()
        };
        assert!(query.matches(&stop()));

        let query = StopQuery {
            name: Some("hle".into()),
            road: Some("pyay".into()),
            ..StopQuery::default()
        };
        assert!(!query.matches(&stop()));
    }

    #[test]
    fn myanmar_labels_match() {
        let query = StopQuery {
            name: Some("လှည်း".into()),
            ..StopQuery::default()
        };
        assert!(query.matches(&stop()));
    }

    #[test]
    fn route_id_fragment_matches() {
        let route = Route::new(
            RouteInfo::new(RouteId::parse("YBS-36").unwrap()),
            Vec::new(),
            Vec::new(),
        );

        assert!(RouteQuery::default().matches(&route));
        assert!(RouteQuery { id: Some("ybs".into()) }.matches(&route));
        assert!(RouteQuery { id: Some("36".into()) }.matches(&route));
        assert!(!RouteQuery { id: Some("61".into()) }.matches(&route));
    }
}
