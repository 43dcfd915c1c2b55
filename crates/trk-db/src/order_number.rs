//! Order-number scheme: `ORD` + counter zero-padded to three digits
//! (`ORD001`, `ORD002`, ... `ORD999`, then `ORD1000`).
//!
//! Numbers come from the `order_counters` row for the prefix, incremented
//! inside the caller's write transaction. The table is only scanned once,
//! at migrate time, to seed the counter from rows that predate it.

use anyhow::{anyhow, Context, Result};
use sqlx::{SqliteConnection, SqlitePool};

pub const ORDER_PREFIX: &str = "ORD";
const PAD_WIDTH: usize = 3;

/// Highest counter value the scheme issues. Supplied `ORD<n>` numbers above
/// it are stored verbatim but neither advance nor seed the counter.
pub const MAX_ORDER_VALUE: i64 = 999_999_999;

pub fn format_order_number(value: i64) -> String {
    format!("{ORDER_PREFIX}{value:0width$}", width = PAD_WIDTH)
}

/// Numeric suffix of an `ORD<digits>` order number, if it is within
/// [`MAX_ORDER_VALUE`].
pub fn parse_suffix(order_number: &str) -> Option<i64> {
    let digits = order_number.strip_prefix(ORDER_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits
        .parse::<i64>()
        .ok()
        .filter(|v| *v <= MAX_ORDER_VALUE)
}

/// Last-issued counter value implied by a set of existing order numbers.
/// Numbers without a parseable suffix are ignored; none at all gives 0, so
/// the next issued number is `ORD001`.
pub fn highest_issued<'a, I>(existing: I) -> i64
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(parse_suffix)
        .max()
        .unwrap_or(0)
}

/// Create or raise the counter row so it is at least the highest existing
/// `ORD` suffix. Returns the counter's last-issued value.
pub async fn seed_order_counter(pool: &SqlitePool) -> Result<i64> {
    let existing: Vec<(String,)> = sqlx::query_as(
        r#"
        select order_number
        from tracking
        where order_number glob 'ORD[0-9]*'
        "#,
    )
    .fetch_all(pool)
    .await
    .context("seed_order_counter scan failed")?;

    let highest = highest_issued(existing.iter().map(|(n,)| n.as_str()));

    let (last_value,): (i64,) = sqlx::query_as(
        r#"
        insert into order_counters (prefix, last_value)
        values (?1, ?2)
        on conflict (prefix) do update
          set last_value = max(last_value, excluded.last_value)
        returning last_value
        "#,
    )
    .bind(ORDER_PREFIX)
    .bind(highest)
    .fetch_one(pool)
    .await
    .context("seed_order_counter upsert failed")?;

    Ok(last_value)
}

/// Issue the next counter value. Must run inside a write transaction
/// together with the insert that uses it.
///
/// Fails without touching the row once the counter reaches
/// [`MAX_ORDER_VALUE`].
pub async fn next_value(conn: &mut SqliteConnection) -> Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        update order_counters
        set last_value = last_value + 1
        where prefix = ?1 and last_value < ?2
        returning last_value
        "#,
    )
    .bind(ORDER_PREFIX)
    .bind(MAX_ORDER_VALUE)
    .fetch_optional(&mut *conn)
    .await
    .context("order counter increment failed")?;

    row.map(|(v,)| v).ok_or_else(|| {
        anyhow!(
            "order counter '{ORDER_PREFIX}' is missing (run migrations) or exhausted at {MAX_ORDER_VALUE}"
        )
    })
}

/// Raise the counter to at least `value` so a client-supplied `ORD<n>`
/// is never issued again. `value` comes from [`parse_suffix`], so it never
/// exceeds [`MAX_ORDER_VALUE`].
pub async fn advance_counter(conn: &mut SqliteConnection, value: i64) -> Result<()> {
    anyhow::ensure!(
        (0..=MAX_ORDER_VALUE).contains(&value),
        "order counter value {value} out of range"
    );
    sqlx::query(
        r#"
        update order_counters
        set last_value = max(last_value, ?2)
        where prefix = ?1
        "#,
    )
    .bind(ORDER_PREFIX)
    .bind(value)
    .execute(&mut *conn)
    .await
    .context("order counter advance failed")?;

    Ok(())
}
