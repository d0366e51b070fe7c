//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::{Coordinates, DistanceUnit, Itinerary, RouteId, StopId};
use crate::planner::{Planner, SearchConfig, SearchError};
use crate::store::{NEAREST_DEFAULT_COUNT, QueryError, RouteQuery, StopQuery, TransitStore};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/stops", get(list_stops))
        .route("/api/v1/stops/nearest", get(nearest_stops))
        .route("/api/v1/stops/:id", get(get_stop))
        .route("/api/v1/routes", get(list_routes))
        .route("/api/v1/routes/find", get(find_routes))
        .route("/api/v1/routes/:id", get(get_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search stops by name, road and township.
async fn list_stops(
    State(state): State<AppState>,
    query: Result<Query<StopsRequest>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(req) = query?;
    let format = parse_format(req.format.as_deref())?;
    let store = snapshot(&state).await?;

    let stops = store.search_stops(&StopQuery {
        name: req.name,
        road: req.road,
        township: req.township,
    });

    Ok(match format {
        ResponseFormat::Json => ok(stops),
        ResponseFormat::Geojson => ok(stop_collection(stops)),
    })
}

/// Stops closest to a point.
async fn nearest_stops(
    State(state): State<AppState>,
    query: Result<Query<NearestRequest>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(req) = query?;
    let format = parse_format(req.format.as_deref())?;
    let lat = parse_degrees("lat", req.lat.as_deref())?;
    let lng = parse_degrees("lng", req.lng.as_deref())?;
    let count = parse_count(req.count.as_deref(), NEAREST_DEFAULT_COUNT)?;
    let unit = parse_unit(req.distance_unit.as_deref())?;

    let store = snapshot(&state).await?;
    let nearby = store.nearest_stops(Coordinates::new(lat, lng), count, unit)?;

    Ok(match format {
        ResponseFormat::Json => ok(nearby
            .iter()
            .map(NearbyStopResult::from_nearby)
            .collect::<Vec<_>>()),
        ResponseFormat::Geojson => ok(nearby_collection(&nearby)),
    })
}

/// Look up one stop.
async fn get_stop(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<FormatRequest>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(req) = query?;
    let format = parse_format(req.format.as_deref())?;
    let id = parse_stop_id("id", &id)?;

    let store = snapshot(&state).await?;
    let stop = store.stop(id).ok_or_else(|| AppError::NotFound {
        message: format!("stop {id} not found"),
    })?;

    Ok(match format {
        ResponseFormat::Json => ok(stop),
        ResponseFormat::Geojson => ok(stop_feature(stop)),
    })
}

/// Search routes by id.
async fn list_routes(
    State(state): State<AppState>,
    query: Result<Query<RoutesRequest>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(req) = query?;
    let format = parse_format(req.format.as_deref())?;

    if let Some(id) = req.id.as_deref().filter(|id| !id.is_empty()) {
        RouteId::parse(id).map_err(|e| AppError::BadRequest {
            message: format!("\"id\": {e}"),
        })?;
    }

    let store = snapshot(&state).await?;
    let routes = store.search_routes(&RouteQuery { id: req.id });

    Ok(match format {
        ResponseFormat::Json => ok(routes),
        ResponseFormat::Geojson => ok(route_collection(routes)),
    })
}

/// Look up one route.
async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<FormatRequest>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(req) = query?;
    let format = parse_format(req.format.as_deref())?;
    let id = RouteId::parse(&id).map_err(|e| AppError::BadRequest {
        message: format!("\"id\": {e}"),
    })?;

    let store = snapshot(&state).await?;
    let route = store.route(&id).ok_or_else(|| AppError::NotFound {
        message: format!("route {id} not found"),
    })?;

    Ok(match format {
        ResponseFormat::Json => ok(route),
        ResponseFormat::Geojson => ok(route_feature(route)),
    })
}

/// Plan itineraries between two stops.
async fn find_routes(
    State(state): State<AppState>,
    query: Result<Query<FindRoutesRequest>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(req) = query?;
    let format = parse_format(req.format.as_deref())?;
    let from = parse_stop_id("from", required("from", req.from.as_deref())?)?;
    let to = parse_stop_id("to", required("to", req.to.as_deref())?)?;
    let count = parse_count(req.count.as_deref(), state.search.max_results)?;
    let unit = parse_unit(req.distance_unit.as_deref())?;

    let config = state.search.with_max_results(count).with_distance_unit(unit);
    config.validate()?;

    let store = snapshot(&state).await?;
    for id in [from, to] {
        if store.stop(id).is_none() {
            return Err(AppError::NotFound {
                message: format!("stop {id} not found"),
            });
        }
    }

    // Searching is CPU-bound; keep it off the async workers
    let itineraries = tokio::task::spawn_blocking(move || plan(&store, from, to, &config))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("route search task failed: {e}"),
        })??;

    info!(%from, %to, found = itineraries.len(), "planned routes");

    Ok(match format {
        ResponseFormat::Json => ok(itineraries),
        ResponseFormat::Geojson => ok(itineraries
            .iter()
            .map(itinerary_collection)
            .collect::<Vec<_>>()),
    })
}

/// Run one search with each endpoint expanded to its whole place.
fn plan(
    store: &TransitStore,
    from: StopId,
    to: StopId,
    config: &SearchConfig,
) -> Result<Vec<Itinerary>, SearchError> {
    let network = store.network();
    let mut planner = Planner::new(network, config);
    planner.set_origin(network.place_of(&from));
    planner.set_destination(network.place_of(&to));

    Ok(planner.search()?.into_results())
}

fn ok<T: Serialize>(data: T) -> Response {
    Json(ApiResponse::ok(data)).into_response()
}

async fn snapshot(state: &AppState) -> Result<Arc<TransitStore>, AppError> {
    state
        .snapshots
        .get()
        .await
        .map_err(|e| AppError::Internal {
            message: format!("snapshot unavailable: {e}"),
        })
}

fn parse_format(value: Option<&str>) -> Result<ResponseFormat, AppError> {
    ResponseFormat::parse(value).ok_or_else(|| AppError::BadRequest {
        message: "\"format\" must be one of json, geojson".to_string(),
    })
}

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest {
            message: format!("\"{name}\" is required"),
        })
}

fn parse_stop_id(name: &str, value: &str) -> Result<StopId, AppError> {
    StopId::parse(value).map_err(|e| AppError::BadRequest {
        message: format!("\"{name}\": {e}"),
    })
}

fn parse_count(value: Option<&str>, default: usize) -> Result<usize, AppError> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };

    match value.trim().parse::<usize>() {
        Ok(count) if count >= 1 => Ok(count),
        Ok(_) => Err(AppError::BadRequest {
            message: "\"count\" must be greater than or equal to 1".to_string(),
        }),
        Err(_) => Err(AppError::BadRequest {
            message: "\"count\" must be a number".to_string(),
        }),
    }
}

fn parse_unit(value: Option<&str>) -> Result<DistanceUnit, AppError> {
    match value.filter(|v| !v.trim().is_empty()) {
        None => Ok(DistanceUnit::default()),
        Some(v) => v.parse().map_err(|e| AppError::BadRequest {
            message: format!("\"distance_unit\": {e}"),
        }),
    }
}

fn parse_degrees(name: &str, value: Option<&str>) -> Result<f64, AppError> {
    let value = required(name, value)?;
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::BadRequest {
            message: format!("\"{name}\" must be a number"),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(message) => AppError::BadRequest { message },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, "BAD_REQUEST", message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, "NOT_FOUND", message),
            AppError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                message,
            ),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse::new(vec![ErrorDetail { code, message }]));
        (status, body).into_response()
    }
}
