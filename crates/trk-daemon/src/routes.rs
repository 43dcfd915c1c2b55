//! Axum router and all HTTP handlers for trk-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Handlers translate verbs/paths into trk-db calls and
//! map outcomes to status codes; no storage logic lives here.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::info;
use trk_db::{DeleteOutcome, UpdateOutcome};
use trk_schemas::{NewTracking, TrackingFilter, TrackingPatch};

use crate::{
    api_types::{CreatedTrackingResponse, HealthResponse},
    error::ApiError,
    state::AppState,
};

/// Resource root for tracking records.
pub const TRACKING_ROOT: &str = "/api/tracking";

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(TRACKING_ROOT, get(list_tracking).post(create_tracking))
        .route(
            "/api/tracking/:order_number",
            get(get_tracking).put(update_tracking).delete(delete_tracking),
        )
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /api/tracking?client_name=&start_date=&end_date=
// ---------------------------------------------------------------------------

pub(crate) async fn list_tracking(
    State(st): State<Arc<AppState>>,
    query: Result<Query<TrackingFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = query?;
    let records = trk_db::list_tracking(&st.pool, &filter).await?;
    Ok(Json(records))
}

// ---------------------------------------------------------------------------
// GET /api/tracking/{order_number}
// ---------------------------------------------------------------------------

pub(crate) async fn get_tracking(
    State(st): State<Arc<AppState>>,
    Path(order_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    match trk_db::get_tracking(&st.pool, &order_number).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::NotFound(order_number)),
    }
}

// ---------------------------------------------------------------------------
// POST /api/tracking
// ---------------------------------------------------------------------------

/// 201 with `Location` pointing at the new record. The order date is stamped
/// here from the wall clock.
pub(crate) async fn create_tracking(
    State(st): State<Arc<AppState>>,
    body: Result<Json<NewTracking>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;

    let record = trk_db::create_tracking(&st.pool, &req, Utc::now()).await?;
    info!(order_number = %record.order_number, "tracking/create");

    let location = format!("{TRACKING_ROOT}/{}", record.order_number);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreatedTrackingResponse::from(record)),
    ))
}

// ---------------------------------------------------------------------------
// PUT /api/tracking/{order_number}
// ---------------------------------------------------------------------------

pub(crate) async fn update_tracking(
    State(st): State<Arc<AppState>>,
    Path(order_number): Path<String>,
    body: Result<Json<TrackingPatch>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(patch) = body?;

    match trk_db::update_tracking(&st.pool, &order_number, &patch).await? {
        UpdateOutcome::Updated => {
            info!(order_number = %order_number, "tracking/update");
            Ok(StatusCode::NO_CONTENT)
        }
        UpdateOutcome::NotFound => Err(ApiError::NotFound(order_number)),
    }
}

// ---------------------------------------------------------------------------
// DELETE /api/tracking/{order_number}
// ---------------------------------------------------------------------------

pub(crate) async fn delete_tracking(
    State(st): State<Arc<AppState>>,
    Path(order_number): Path<String>,
) -> Result<StatusCode, ApiError> {
    match trk_db::delete_tracking(&st.pool, &order_number).await? {
        DeleteOutcome::Deleted => {
            info!(order_number = %order_number, "tracking/delete");
            Ok(StatusCode::NO_CONTENT)
        }
        DeleteOutcome::NotFound => Err(ApiError::NotFound(order_number)),
    }
}
