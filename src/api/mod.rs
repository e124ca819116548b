use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::destinations::DestinationPicker;
use crate::error::FlightIdeasError;
use crate::formatter::ModeInfo;
use crate::models::{Climate, Destination, SearchPayload, SearchResponse};
use crate::planner::{self, TravelPreferences, TripDuration, TripPlanner};
use crate::pricing::ModeResolver;

/// Largest `count` accepted by the query endpoints
const MAX_COUNT: usize = 20;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ModeResolver>,
}

impl AppState {
    #[must_use]
    pub fn new(resolver: ModeResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

impl IntoResponse for FlightIdeasError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/flights", post(search_flights))
        .route("/mode", get(get_mode))
        .route("/destinations", get(get_destinations))
        .route("/ideas", get(get_ideas))
        .with_state(state)
}

async fn search_flights(
    State(state): State<AppState>,
    payload: Result<Json<SearchPayload>, JsonRejection>,
) -> Result<Json<SearchResponse>, FlightIdeasError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!("Rejected flight search body: {}", rejection.body_text());
        FlightIdeasError::validation(rejection.body_text())
    })?;
    let request = payload.validate()?;

    info!(
        "POST /flights {} → {:?}",
        request.origin,
        request.destinations.iter().map(|d| d.code.as_str()).collect::<Vec<_>>()
    );
    Ok(Json(state.resolver.get_flight_prices(&request).await))
}

async fn get_mode(State(state): State<AppState>) -> Json<ModeInfo> {
    Json(state.resolver.mode_info())
}

#[derive(Debug, Deserialize)]
struct DestinationsQuery {
    climate: Option<String>,
    count: Option<usize>,
}

async fn get_destinations(
    State(state): State<AppState>,
    Query(query): Query<DestinationsQuery>,
) -> Json<Vec<Destination>> {
    let climate = Climate::parse_lenient(query.climate.as_deref().unwrap_or_default());
    let count = resolve_count(query.count, &state);
    Json(DestinationPicker::pick(climate, count))
}

#[derive(Debug, Deserialize)]
struct IdeasQuery {
    origin: Option<String>,
    climate: Option<String>,
    duration: Option<String>,
    departure: Option<String>,
    count: Option<usize>,
}

async fn get_ideas(
    State(state): State<AppState>,
    Query(query): Query<IdeasQuery>,
) -> Result<Json<SearchResponse>, FlightIdeasError> {
    let config = state.resolver.config();
    let origin = query
        .origin
        .filter(|o| !o.trim().is_empty())
        .unwrap_or_else(|| config.search.default_origin.clone());

    let duration = query
        .duration
        .as_deref()
        .unwrap_or_default()
        .parse::<TripDuration>()
        .map_err(FlightIdeasError::validation)?;

    let departure = match query.departure.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| {
                FlightIdeasError::validation(format!(
                    "departure must be an ISO date (YYYY-MM-DD), got '{value}'"
                ))
            })?,
        _ => planner::default_departure(),
    };

    let preferences = TravelPreferences {
        climate: Climate::parse_lenient(query.climate.as_deref().unwrap_or_default()),
        duration,
    };
    let count = resolve_count(query.count, &state);
    let request = TripPlanner::plan(&origin, preferences, departure, count);

    Ok(Json(state.resolver.get_flight_prices(&request).await))
}

fn resolve_count(requested: Option<usize>, state: &AppState) -> usize {
    requested
        .unwrap_or(state.resolver.config().search.destination_count as usize)
        .min(MAX_COUNT)
}
