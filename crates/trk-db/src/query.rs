//! Read-only access to tracking records.

use anyhow::{Context, Result};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use trk_schemas::{TrackingFilter, TrackingRecord};

use crate::mapper::{encode_lower_bound, encode_ts, TrackingRow};

/// List records matching `filter`, in insertion order.
///
/// - `client_name`: exact match (empty string = no condition)
/// - `start_date` / `end_date`: inclusive bounds on `shipping_date`
///
/// No conditions returns every record. No match returns an empty vec.
pub async fn list_tracking(pool: &SqlitePool, filter: &TrackingFilter) -> Result<Vec<TrackingRecord>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        select order_number, tracking_numbers, client_name, address,
               order_date, shipping_date, status
        from tracking
        where 1 = 1
        "#,
    );

    if let Some(name) = filter.client_name() {
        qb.push(" and client_name = ").push_bind(name.to_string());
    }
    if let Some(start) = filter.start_date {
        qb.push(" and shipping_date >= ").push_bind(encode_lower_bound(start));
    }
    if let Some(end) = filter.end_date {
        qb.push(" and shipping_date <= ").push_bind(encode_ts(end));
    }
    qb.push(" order by rowid asc");

    let rows: Vec<TrackingRow> = qb
        .build_query_as::<TrackingRow>()
        .fetch_all(pool)
        .await
        .context("list_tracking failed")?;

    rows.into_iter().map(TrackingRow::into_record).collect()
}

/// Exact-match lookup. `Ok(None)` when absent.
pub async fn get_tracking(pool: &SqlitePool, order_number: &str) -> Result<Option<TrackingRecord>> {
    let row: Option<TrackingRow> = sqlx::query_as(
        r#"
        select order_number, tracking_numbers, client_name, address,
               order_date, shipping_date, status
        from tracking
        where order_number = ?1
        "#,
    )
    .bind(order_number)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("get_tracking {order_number} failed"))?;

    row.map(TrackingRow::into_record).transpose()
}
