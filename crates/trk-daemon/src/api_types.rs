//! Response types for trk-daemon HTTP endpoints that are not plain
//! `trk_schemas` records.
//!
//! These types are `Serialize + Deserialize` so they can be JSON-encoded
//! by Axum and decoded by tests. No business logic lives here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trk_schemas::TrackingRecord;

// ---------------------------------------------------------------------------
// /health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// Errors (4xx / 5xx)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// POST /api/tracking
// ---------------------------------------------------------------------------

/// 201 body: the create request echoed back with the assigned order number
/// and the tracking numbers actually stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedTrackingResponse {
    pub order_number: String,
    pub tracking_numbers: Vec<String>,
    pub status: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub shipping_date: DateTime<Utc>,
}

impl From<TrackingRecord> for CreatedTrackingResponse {
    fn from(r: TrackingRecord) -> Self {
        Self {
            order_number: r.order_number,
            tracking_numbers: r.tracking_numbers,
            status: r.status,
            client_name: r.client_name,
            address: r.address,
            shipping_date: r.shipping_date,
        }
    }
}
