//! Domain and wire types shared by trk-db, trk-daemon and trk-cli.
//!
//! Everything here is plain data: `Serialize`/`Deserialize` types plus the
//! small pure helpers they need to decode request shapes. No I/O.

pub mod datetime;
pub mod patch;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One shipment order as stored and returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub order_number: String,
    #[serde(default)]
    pub tracking_numbers: Vec<String>,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub order_date: DateTime<Utc>,
    pub shipping_date: DateTime<Utc>,
    /// Free-form ("Pending", "Shipped", ...). Not validated.
    pub status: String,
}

/// Create request.
///
/// `order_number` and `tracking_numbers` are optional; the command path
/// fills them in when they are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTracking {
    pub order_number: Option<String>,
    pub tracking_numbers: Option<Vec<String>>,
    pub status: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub shipping_date: DateTime<Utc>,
}

/// Partial update request.
///
/// `shipping_date` is required and always applied. The other fields only
/// replace stored values when non-empty, see [`patch`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackingPatch {
    #[serde(default, deserialize_with = "patch::deserialize")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "patch::deserialize")]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "patch::deserialize")]
    pub address: Option<String>,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub shipping_date: DateTime<Utc>,
}

/// List predicate. All present conditions are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrackingFilter {
    /// Exact match. Empty is treated as absent.
    #[serde(default)]
    pub client_name: Option<String>,
    /// Inclusive lower bound on `shipping_date`.
    #[serde(default, deserialize_with = "datetime::option::deserialize")]
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `shipping_date`.
    #[serde(default, deserialize_with = "datetime::option::deserialize")]
    pub end_date: Option<DateTime<Utc>>,
}

impl TrackingFilter {
    /// The client-name condition, if it is set to something non-empty.
    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.client_name().is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}
