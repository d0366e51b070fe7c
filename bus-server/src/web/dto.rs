//! Data transfer objects for web requests and responses.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, feature::Id};
use serde::{Deserialize, Serialize};

use crate::domain::{Itinerary, LocalizedText, Route, RouteInfo, Stop};
use crate::geometry;
use crate::store::NearbyStop;

/// Shape of the `data` payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Geojson,
}

impl ResponseFormat {
    /// Parse the `format` query parameter; absent means JSON.
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("json") => Some(ResponseFormat::Json),
            Some("geojson") => Some(ResponseFormat::Geojson),
            Some(_) => None,
        }
    }
}

/// Query for `GET /api/v1/stops`.
#[derive(Debug, Default, Deserialize)]
pub struct StopsRequest {
    pub name: Option<String>,
    pub road: Option<String>,
    pub township: Option<String>,
    pub format: Option<String>,
}

/// Query for `GET /api/v1/stops/nearest`.
#[derive(Debug, Default, Deserialize)]
pub struct NearestRequest {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub count: Option<String>,
    pub distance_unit: Option<String>,
    pub format: Option<String>,
}

/// Query for `GET /api/v1/routes`.
#[derive(Debug, Default, Deserialize)]
pub struct RoutesRequest {
    pub id: Option<String>,
    pub format: Option<String>,
}

/// Query for `GET /api/v1/routes/find`.
#[derive(Debug, Default, Deserialize)]
pub struct FindRoutesRequest {
    /// Stop id to start from
    pub from: Option<String>,

    /// Stop id to reach
    pub to: Option<String>,

    /// Maximum number of itineraries
    pub count: Option<String>,

    pub distance_unit: Option<String>,
    pub format: Option<String>,
}

/// Query for single-record lookups.
#[derive(Debug, Default, Deserialize)]
pub struct FormatRequest {
    pub format: Option<String>,
}

/// Successful response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// One problem with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub errors: Vec<ErrorDetail>,
    /// Always null.
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errors: Vec<ErrorDetail>) -> Self {
        Self {
            status: "error",
            errors,
            data: None,
        }
    }
}

/// A stop in a nearest-stop lookup.
#[derive(Debug, Serialize)]
pub struct NearbyStopResult {
    #[serde(flatten)]
    pub stop: Stop,

    /// Distance from the query point in the requested unit
    pub distance: f64,
}

impl NearbyStopResult {
    pub fn from_nearby(nearby: &NearbyStop<'_>) -> Self {
        Self {
            stop: nearby.stop.clone(),
            distance: nearby.distance,
        }
    }
}

// GeoJSON conversions

/// A stop as a Point feature; properties are its labels.
pub fn stop_feature(stop: &Stop) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("name".into(), localized(&stop.name));
    properties.insert("road".into(), localized(&stop.road));
    properties.insert("township".into(), localized(&stop.township));

    Feature {
        bbox: None,
        geometry: Some(Geometry::from(&geometry::point(stop.position()))),
        id: Some(Id::Number(stop.id.get().into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn stop_collection<'a>(stops: impl IntoIterator<Item = &'a Stop>) -> FeatureCollection {
    collection(stops.into_iter().map(stop_feature).collect())
}

/// Nearby stops as Point features carrying their distance.
pub fn nearby_collection(nearby: &[NearbyStop<'_>]) -> FeatureCollection {
    collection(
        nearby
            .iter()
            .map(|n| {
                let mut feature = stop_feature(n.stop);
                feature.set_property("distance", n.distance);
                feature
            })
            .collect(),
    )
}

/// A route as a LineString feature.
///
/// Properties are the route's metadata plus its stop ids.
pub fn route_feature(route: &Route) -> Feature {
    let mut properties = route_properties(&route.info);
    properties.insert(
        "stops".into(),
        route.stops.iter().map(|s| JsonValue::from(s.get())).collect(),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::from(&geometry::line_string(&route.coordinates))),
        id: Some(Id::String(route.id().to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn route_collection<'a>(routes: impl IntoIterator<Item = &'a Route>) -> FeatureCollection {
    collection(routes.into_iter().map(route_feature).collect())
}

/// An itinerary as one LineString feature per leg.
///
/// Each leg carries the trimmed stop ids and the distance ridden; the
/// collection carries the itinerary id and total distance.
pub fn itinerary_collection(itinerary: &Itinerary) -> FeatureCollection {
    let features = itinerary
        .routes()
        .iter()
        .zip(itinerary.steps())
        .map(|(route, step)| {
            let mut feature = route_feature(route);
            feature.set_property("distance", step.distance);
            feature
        })
        .collect();

    let mut members = JsonObject::new();
    members.insert("id".into(), itinerary.id().into());
    members.insert("distance".into(), itinerary.distance().into());

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(members),
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn route_properties(info: &RouteInfo) -> JsonObject {
    let mut properties = info.extra.clone();
    properties.insert("route_id".into(), info.route_id.as_str().into());
    properties.insert("name".into(), localized(&info.name));
    if let Some(color) = &info.color {
        properties.insert("color".into(), color.as_str().into());
    }
    properties
}

fn localized(text: &LocalizedText) -> JsonValue {
    serde_json::json!({ "en": text.en, "mm": text.mm })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, Leg, RouteId, StopId};

    fn make_stop() -> Stop {
        Stop {
            id: StopId::new(12),
            name: LocalizedText::new("Myaynigone", "မြေနီကုန်း"),
            road: LocalizedText::new("Pyay Rd", ""),
            township: LocalizedText::new("Sanchaung", ""),
            lat: 16.81,
            lng: 96.13,
        }
    }

    fn make_route(id: &str, stops: &[u32]) -> Route {
        let mut info = RouteInfo::new(RouteId::parse(id).unwrap());
        info.color = Some("#00ff00".into());
        info.extra.insert("fare".into(), "flat".into());
        Route::new(
            info,
            stops.iter().map(|s| StopId::new(*s)).collect(),
            vec![Coordinates::new(16.8, 96.1), Coordinates::new(16.9, 96.2)],
        )
    }

    #[test]
    fn parse_response_format() {
        assert_eq!(ResponseFormat::parse(None), Some(ResponseFormat::Json));
        assert_eq!(ResponseFormat::parse(Some("json")), Some(ResponseFormat::Json));
        assert_eq!(
            ResponseFormat::parse(Some("GeoJSON")),
            Some(ResponseFormat::Geojson)
        );
        assert_eq!(ResponseFormat::parse(Some("xml")), None);
    }

    #[test]
    fn envelopes() {
        let ok = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "ok", "data": [1, 2]}));

        let err = serde_json::to_value(ErrorResponse::new(vec![ErrorDetail {
            code: "BAD_REQUEST",
            message: "\"from\" is required".into(),
        }]))
        .unwrap();
        assert_eq!(err["status"], "error");
        assert_eq!(err["errors"][0]["code"], "BAD_REQUEST");
        assert!(err["data"].is_null());
    }

    #[test]
    fn stop_feature_is_a_point() {
        let json = serde_json::to_value(stop_feature(&make_stop())).unwrap();

        assert_eq!(json["type"], "Feature");
        assert_eq!(json["id"], 12);
        assert_eq!(json["geometry"]["type"], "Point");
        assert_eq!(json["geometry"]["coordinates"], serde_json::json!([96.13, 16.81]));
        assert_eq!(json["properties"]["name"]["en"], "Myaynigone");
        assert_eq!(json["properties"]["township"]["en"], "Sanchaung");
    }

    #[test]
    fn nearby_stop_result_flattens_stop() {
        let stop = make_stop();
        let nearby = NearbyStop {
            stop: &stop,
            distance: 1.5,
        };

        let json = serde_json::to_value(NearbyStopResult::from_nearby(&nearby)).unwrap();
        assert_eq!(json["id"], 12);
        assert_eq!(json["distance"], 1.5);

        let collection = serde_json::to_value(nearby_collection(&[nearby])).unwrap();
        assert_eq!(collection["features"][0]["properties"]["distance"], 1.5);
    }

    #[test]
    fn route_feature_is_a_line() {
        let json = serde_json::to_value(route_feature(&make_route("36", &[1, 2]))).unwrap();

        assert_eq!(json["id"], "36");
        assert_eq!(json["geometry"]["type"], "LineString");
        assert_eq!(
            json["geometry"]["coordinates"],
            serde_json::json!([[96.1, 16.8], [96.2, 16.9]])
        );
        assert_eq!(json["properties"]["route_id"], "36");
        assert_eq!(json["properties"]["color"], "#00ff00");
        assert_eq!(json["properties"]["fare"], "flat");
        assert_eq!(json["properties"]["stops"], serde_json::json!([1, 2]));
    }

    #[test]
    fn itinerary_collection_has_one_feature_per_leg() {
        let itinerary = Itinerary::new(vec![
            Leg::new(make_route("36", &[1, 2, 3]), 2.0),
            Leg::new(make_route("61", &[3, 5]), 1.25),
        ])
        .unwrap();

        let json = serde_json::to_value(itinerary_collection(&itinerary)).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["id"], "36 - 61");
        assert_eq!(json["distance"], 3.25);
        assert_eq!(json["features"].as_array().unwrap().len(), 2);
        assert_eq!(json["features"][1]["properties"]["distance"], 1.25);
        assert_eq!(json["features"][1]["properties"]["stops"], serde_json::json!([3, 5]));
    }
}
