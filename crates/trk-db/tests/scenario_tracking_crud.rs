//! Scenario: create / read / merge-update / delete against a real SQLite store.
//!
//! # Invariants under test
//!
//! - A created record reads back with the client-supplied fields and a
//!   stamped `order_date`.
//! - `tracking_numbers` round-trips in order; a placeholder is synthesised
//!   when none is supplied.
//! - Merge-update keeps fields for omitted, null or empty values and
//!   overwrites for non-empty ones; an absent record is NotFound, never
//!   upserted.
//! - Delete is idempotent: a missing record is NotFound, not an error.
//! - A corrupted timestamp column fails the read.
//!
//! In-memory DB; no external services required.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use trk_db::{DeleteOutcome, UpdateOutcome};
use trk_schemas::{NewTracking, TrackingFilter, TrackingPatch};

fn new_tracking(client: &str) -> NewTracking {
    NewTracking {
        order_number: None,
        tracking_numbers: None,
        status: "Pending".to_string(),
        client_name: Some(client.to_string()),
        address: Some("12 Harbour Rd".to_string()),
        shipping_date: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
    }
}

fn patch_shipping_only() -> TrackingPatch {
    TrackingPatch {
        status: None,
        client_name: None,
        address: None,
        shipping_date: Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn get_after_create_returns_supplied_fields() -> Result<()> {
    let pool = trk_db::connect_in_memory().await?;
    let now = Utc.with_ymd_and_hms(2024, 1, 20, 8, 0, 0).unwrap();

    let created = trk_db::create_tracking(&pool, &new_tracking("Alice"), now).await?;
    let fetched = trk_db::get_tracking(&pool, &created.order_number)
        .await?
        .expect("created record must be readable");

    assert_eq!(fetched.order_number, "ORD001");
    assert_eq!(fetched.client_name.as_deref(), Some("Alice"));
    assert_eq!(fetched.address.as_deref(), Some("12 Harbour Rd"));
    assert_eq!(fetched.status, "Pending");
    assert_eq!(fetched.shipping_date, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    assert_eq!(fetched.order_date, now);
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn tracking_numbers_round_trip_in_order() -> Result<()> {
    let pool = trk_db::connect_in_memory().await?;
    let req = NewTracking {
        tracking_numbers: Some(vec!["A".into(), "B".into(), "C".into()]),
        ..new_tracking("Alice")
    };

    let created = trk_db::create_tracking(&pool, &req, Utc::now()).await?;
    let fetched = trk_db::get_tracking(&pool, &created.order_number).await?.unwrap();

    assert_eq!(fetched.tracking_numbers, vec!["A", "B", "C"]);
    Ok(())
}

#[tokio::test]
async fn missing_tracking_numbers_get_a_placeholder() -> Result<()> {
    let pool = trk_db::connect_in_memory().await?;

    for req in [
        new_tracking("Alice"),
        NewTracking {
            tracking_numbers: Some(vec![]),
            ..new_tracking("Bob")
        },
    ] {
        let created = trk_db::create_tracking(&pool, &req, Utc::now()).await?;
        let fetched = trk_db::get_tracking(&pool, &created.order_number).await?.unwrap();
        assert_eq!(fetched.tracking_numbers.len(), 1);
        assert!(fetched.tracking_numbers[0].starts_with("TRK"));
    }
    Ok(())
}

#[tokio::test]
async fn get_missing_is_none_not_error() -> Result<()> {
    let pool = trk_db::connect_in_memory().await?;
    assert!(trk_db::get_tracking(&pool, "ORD404").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn update_merges_only_non_empty_fields() -> Result<()> {
    let pool = trk_db::connect_in_memory().await?;
    let created = trk_db::create_tracking(&pool, &new_tracking("Alice"), Utc::now()).await?;
    let order = created.order_number.as_str();

    // Empty client_name: unchanged.
    let empty = TrackingPatch {
        client_name: Some(String::new()),
        ..patch_shipping_only()
    };
    assert_eq!(trk_db::update_tracking(&pool, order, &empty).await?, UpdateOutcome::Updated);
    let after = trk_db::get_tracking(&pool, order).await?.unwrap();
    assert_eq!(after.client_name.as_deref(), Some("Alice"));
    assert_eq!(after.shipping_date, Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap());

    // Non-empty client_name and status: overwritten.
    let bob = TrackingPatch {
        status: Some("Shipped".to_string()),
        client_name: Some("Bob".to_string()),
        ..patch_shipping_only()
    };
    trk_db::update_tracking(&pool, order, &bob).await?;
    let after = trk_db::get_tracking(&pool, order).await?.unwrap();
    assert_eq!(after.client_name.as_deref(), Some("Bob"));
    assert_eq!(after.status, "Shipped");
    assert_eq!(after.address.as_deref(), Some("12 Harbour Rd"));
    assert_eq!(after.order_date, created.order_date);
    assert_eq!(after.tracking_numbers, created.tracking_numbers);

    // A null on the wire arrives as None and keeps the stored value.
    let null_address: TrackingPatch = serde_json::from_value(serde_json::json!({
        "address": null,
        "client_name": null,
        "shipping_date": "2024-02-11"
    }))?;
    trk_db::update_tracking(&pool, order, &null_address).await?;
    let after = trk_db::get_tracking(&pool, order).await?.unwrap();
    assert_eq!(after.address.as_deref(), Some("12 Harbour Rd"));
    assert_eq!(after.client_name.as_deref(), Some("Bob"));
    Ok(())
}

#[tokio::test]
async fn update_missing_is_not_found_and_creates_nothing() -> Result<()> {
    let pool = trk_db::connect_in_memory().await?;

    let outcome = trk_db::update_tracking(&pool, "ORD777", &patch_shipping_only()).await?;

    assert_eq!(outcome, UpdateOutcome::NotFound);
    assert!(trk_db::list_tracking(&pool, &TrackingFilter::default()).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_is_idempotent() -> Result<()> {
    let pool = trk_db::connect_in_memory().await?;
    let created = trk_db::create_tracking(&pool, &new_tracking("Alice"), Utc::now()).await?;

    assert_eq!(
        trk_db::delete_tracking(&pool, &created.order_number).await?,
        DeleteOutcome::Deleted
    );
    assert!(trk_db::get_tracking(&pool, &created.order_number).await?.is_none());

    for _ in 0..2 {
        assert_eq!(
            trk_db::delete_tracking(&pool, "ORD999").await?,
            DeleteOutcome::NotFound
        );
    }
    assert_eq!(
        trk_db::delete_tracking(&pool, &created.order_number).await?,
        DeleteOutcome::NotFound
    );
    Ok(())
}

#[tokio::test]
async fn duplicate_supplied_order_number_is_a_storage_error() -> Result<()> {
    let pool = trk_db::connect_in_memory().await?;
    let req = NewTracking {
        order_number: Some("CUSTOM-1".to_string()),
        ..new_tracking("Alice")
    };

    trk_db::create_tracking(&pool, &req, Utc::now()).await?;
    let err = trk_db::create_tracking(&pool, &req, Utc::now())
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("insert tracking CUSTOM-1 failed"), "{err:#}");

    // The failed transaction was rolled back; the pool is still usable.
    let next = trk_db::create_tracking(&pool, &new_tracking("Bob"), Utc::now()).await?;
    assert_eq!(next.order_number, "ORD001");
    Ok(())
}

#[tokio::test]
async fn corrupt_timestamp_fails_reads() -> Result<()> {
    let pool = trk_db::connect_in_memory().await?;
    let created = trk_db::create_tracking(&pool, &new_tracking("Alice"), Utc::now()).await?;

    sqlx::query("update tracking set shipping_date = 'not-a-date' where order_number = ?1")
        .bind(&created.order_number)
        .execute(&pool)
        .await?;

    let err = trk_db::get_tracking(&pool, &created.order_number)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("not-a-date"), "{err:#}");

    assert!(trk_db::list_tracking(&pool, &TrackingFilter::default())
        .await
        .is_err());
    Ok(())
}

#[tokio::test]
async fn status_reports_schema_after_migrate() -> Result<()> {
    let pool = trk_db::connect_in_memory().await?;
    let st = trk_db::status(&pool).await?;
    assert!(st.ok);
    assert!(st.has_tracking_table);

    // Migrating twice is a no-op.
    trk_db::migrate(&pool).await?;
    Ok(())
}

#[tokio::test]
async fn created_record_serialises_for_the_wire() -> Result<()> {
    let pool = trk_db::connect_in_memory().await?;
    let created = trk_db::create_tracking(&pool, &new_tracking("Alice"), Utc::now()).await?;

    let json = serde_json::to_value(&created)?;
    assert_eq!(json["order_number"], "ORD001");
    assert!(json["order_date"].as_str().is_some_and(|s| !s.is_empty()));
    Ok(())
}
