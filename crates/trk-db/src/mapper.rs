//! Record <-> row conversions.
//!
//! - `tracking_numbers` is stored comma-joined and split back with empty
//!   segments dropped. A tracking number that itself contains a comma does
//!   not survive the round trip.
//! - Timestamps are stored as fixed-width UTC RFC 3339 with microseconds
//!   (`2024-02-01T00:00:00.000000Z`). Fixed width keeps text comparison in
//!   SQL equal to chronological comparison, which `query::list_tracking`
//!   relies on for its date range. Sub-microsecond precision is truncated,
//!   so filter lower bounds go through [`encode_lower_bound`].

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use trk_schemas::TrackingRecord;

const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// The persisted column set of the `tracking` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TrackingRow {
    pub order_number: String,
    pub tracking_numbers: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub order_date: String,
    pub shipping_date: String,
    pub status: String,
}

impl TrackingRow {
    pub fn from_record(record: &TrackingRecord) -> Self {
        Self {
            order_number: record.order_number.clone(),
            tracking_numbers: join_tracking_numbers(&record.tracking_numbers),
            client_name: record.client_name.clone(),
            address: record.address.clone(),
            order_date: encode_ts(record.order_date),
            shipping_date: encode_ts(record.shipping_date),
            status: record.status.clone(),
        }
    }

    /// Fails if either timestamp column does not parse.
    pub fn into_record(self) -> Result<TrackingRecord> {
        let order_date = decode_ts(&self.order_date)
            .with_context(|| format!("tracking {}: bad order_date", self.order_number))?;
        let shipping_date = decode_ts(&self.shipping_date)
            .with_context(|| format!("tracking {}: bad shipping_date", self.order_number))?;

        Ok(TrackingRecord {
            tracking_numbers: split_tracking_numbers(&self.tracking_numbers),
            order_number: self.order_number,
            client_name: self.client_name,
            address: self.address,
            order_date,
            shipping_date,
            status: self.status,
        })
    }
}

pub fn join_tracking_numbers(numbers: &[String]) -> String {
    numbers.join(",")
}

pub fn split_tracking_numbers(stored: &str) -> Vec<String> {
    stored
        .split(',')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// Encoding for an inclusive lower bound: rounded up to the next stored
/// microsecond so truncation never admits values below the bound. Upper
/// bounds use plain [`encode_ts`], where truncation is already exact.
pub fn encode_lower_bound(ts: DateTime<Utc>) -> String {
    let sub_micro = ts.timestamp_subsec_nanos() % 1_000;
    if sub_micro == 0 {
        return encode_ts(ts);
    }
    let step = Duration::nanoseconds(i64::from(1_000 - sub_micro));
    encode_ts(ts.checked_add_signed(step).unwrap_or(ts))
}

pub fn decode_ts(stored: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(stored)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("invalid stored timestamp '{stored}'"))
}
