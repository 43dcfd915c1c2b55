//! Create / update / delete.
//!
//! Updates are explicit: load the record, merge the patch in memory, write
//! the whole merged row back. Creates take the order number from the
//! counter row inside the same transaction as the insert, so two concurrent
//! creates can never be handed the same number.
//!
//! Every statement path in a create starts with a write (counter update or
//! the insert itself), so the transaction takes SQLite's write lock before it
//! reads anything and concurrent creates queue on the busy timeout instead
//! of failing on a lock upgrade.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use trk_schemas::{patch, NewTracking, TrackingPatch, TrackingRecord};
use tracing::warn;
use uuid::Uuid;

use crate::mapper::TrackingRow;
use crate::order_number;
use crate::query::get_tracking;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Insert a new record and return it as stored.
///
/// - `order_number`: used verbatim when supplied and non-blank, otherwise
///   the next `ORD###` from the counter. A supplied `ORD<n>` raises the
///   counter to `n` unless `n` is past [`order_number::MAX_ORDER_VALUE`].
/// - `tracking_numbers`: a single placeholder token when absent or empty.
/// - `order_date`: stamped from the caller's clock.
///
/// A duplicate supplied order number fails with the underlying constraint
/// error.
pub async fn create_tracking(
    pool: &SqlitePool,
    req: &NewTracking,
    order_date: DateTime<Utc>,
) -> Result<TrackingRecord> {
    // Dropping `tx` before commit rolls it back, so a cancelled create
    // never returns a connection to the pool mid-transaction.
    let mut tx = pool
        .begin()
        .await
        .context("create_tracking: begin failed")?;

    match insert_new(&mut *tx, req, order_date).await {
        Ok(record) => {
            tx.commit()
                .await
                .context("create_tracking: commit failed")?;
            Ok(record)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                warn!(error = %rollback, "create_tracking: rollback failed");
            }
            Err(e)
        }
    }
}

async fn insert_new(
    conn: &mut SqliteConnection,
    req: &NewTracking,
    order_date: DateTime<Utc>,
) -> Result<TrackingRecord> {
    let supplied = req
        .order_number
        .as_deref()
        .filter(|s| !s.trim().is_empty());

    let order_number = match supplied {
        Some(n) => {
            if let Some(value) = order_number::parse_suffix(n) {
                order_number::advance_counter(&mut *conn, value).await?;
            }
            n.to_string()
        }
        None => order_number::format_order_number(order_number::next_value(&mut *conn).await?),
    };

    let tracking_numbers = match &req.tracking_numbers {
        Some(numbers) if !numbers.is_empty() => numbers.clone(),
        _ => vec![placeholder_tracking_number()],
    };

    let record = TrackingRecord {
        order_number,
        tracking_numbers,
        client_name: req.client_name.clone(),
        address: req.address.clone(),
        order_date,
        shipping_date: req.shipping_date,
        status: req.status.clone(),
    };
    let row = TrackingRow::from_record(&record);

    sqlx::query(
        r#"
        insert into tracking (
          order_number, tracking_numbers, client_name, address,
          order_date, shipping_date, status
        ) values (
          ?1, ?2, ?3, ?4, ?5, ?6, ?7
        )
        "#,
    )
    .bind(&row.order_number)
    .bind(&row.tracking_numbers)
    .bind(&row.client_name)
    .bind(&row.address)
    .bind(&row.order_date)
    .bind(&row.shipping_date)
    .bind(&row.status)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("insert tracking {} failed", record.order_number))?;

    Ok(record)
}

/// Short random token used when a create request carries no tracking numbers.
pub fn placeholder_tracking_number() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("TRK{}", hex[..8].to_uppercase())
}

/// Merge `patch` into `record`.
///
/// - `status` / `client_name` / `address`: overwritten only by a non-empty
///   value, see [`trk_schemas::patch`]
/// - `shipping_date`: always overwritten
/// - `order_number`, `order_date`, `tracking_numbers`: never touched
pub fn apply_patch(record: &mut TrackingRecord, patch: &TrackingPatch) {
    if let Some(status) = patch::replacement(&patch.status) {
        record.status = status.to_string();
    }
    patch::merge_into(&mut record.client_name, &patch.client_name);
    patch::merge_into(&mut record.address, &patch.address);
    record.shipping_date = patch.shipping_date;
}

/// Load, merge, write back. Absent record is `NotFound`, never an upsert.
pub async fn update_tracking(
    pool: &SqlitePool,
    order_number: &str,
    patch: &TrackingPatch,
) -> Result<UpdateOutcome> {
    let Some(mut record) = get_tracking(pool, order_number).await? else {
        return Ok(UpdateOutcome::NotFound);
    };

    apply_patch(&mut record, patch);
    let row = TrackingRow::from_record(&record);

    let res = sqlx::query(
        r#"
        update tracking
        set tracking_numbers = ?2,
            client_name = ?3,
            address = ?4,
            order_date = ?5,
            shipping_date = ?6,
            status = ?7
        where order_number = ?1
        "#,
    )
    .bind(&row.order_number)
    .bind(&row.tracking_numbers)
    .bind(&row.client_name)
    .bind(&row.address)
    .bind(&row.order_date)
    .bind(&row.shipping_date)
    .bind(&row.status)
    .execute(pool)
    .await
    .with_context(|| format!("update tracking {order_number} failed"))?;

    // Deleted between the load and the write.
    if res.rows_affected() == 0 {
        return Ok(UpdateOutcome::NotFound);
    }
    Ok(UpdateOutcome::Updated)
}

/// Physical delete. Deleting an absent record is a no-op reported as
/// `NotFound`.
pub async fn delete_tracking(pool: &SqlitePool, order_number: &str) -> Result<DeleteOutcome> {
    let res = sqlx::query("delete from tracking where order_number = ?1")
        .bind(order_number)
        .execute(pool)
        .await
        .with_context(|| format!("delete tracking {order_number} failed"))?;

    if res.rows_affected() == 0 {
        Ok(DeleteOutcome::NotFound)
    } else {
        Ok(DeleteOutcome::Deleted)
    }
}
