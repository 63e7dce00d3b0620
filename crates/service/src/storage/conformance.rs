//! Behaviour every [`Storage`] backend must share.
//!
//! Assertions only look at records created by the run itself, so the suite is
//! safe against databases that already hold data.

use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use models::{InsertUser, InsertWastePickup, UpdateWastePickup};

use super::Storage;
use crate::errors::StorageError;

pub async fn run_all(storage: &dyn Storage) -> Result<()> {
    create_then_get_round_trips(storage).await.context("create_then_get_round_trips")?;
    update_changes_only_given_fields(storage).await.context("update_changes_only_given_fields")?;
    update_clears_preferred_date_on_null(storage).await.context("update_clears_preferred_date_on_null")?;
    update_unknown_id_does_not_upsert(storage).await.context("update_unknown_id_does_not_upsert")?;
    delete_then_get_is_absent(storage).await.context("delete_then_get_is_absent")?;
    malformed_ids_are_absent(storage).await.context("malformed_ids_are_absent")?;
    list_contains_each_record_once_newest_first(storage).await.context("list_contains_each_record_once_newest_first")?;
    usernames_are_unique(storage).await.context("usernames_are_unique")?;
    Ok(())
}

fn pickup(name: &str) -> InsertWastePickup {
    InsertWastePickup {
        full_name: name.to_string(),
        location: "Nairobi".into(),
        waste_type: "Organic".into(),
        preferred_date: None,
    }
}

/// Document stores keep millisecond timestamps.
fn millis(t: DateTime<Utc>) -> i64 {
    t.timestamp_millis()
}

async fn create_then_get_round_trips(storage: &dyn Storage) -> Result<()> {
    let before = Utc::now();
    let created = storage.create_waste_pickup(pickup("Jane Doe")).await?;
    ensure!(!created.id.is_empty(), "id must be assigned");
    ensure!(millis(created.created_at) >= millis(before), "created_at precedes the call");
    ensure!(created.preferred_date.is_none(), "absent preferred date must be null");
    ensure!(created.full_name == "Jane Doe" && created.location == "Nairobi" && created.waste_type == "Organic");

    let fetched = storage.get_waste_pickup(&created.id).await?;
    ensure!(fetched.as_ref() == Some(&created), "fetched {fetched:?} != created {created:?}");

    let dated = storage
        .create_waste_pickup(InsertWastePickup { preferred_date: Some("2025-06-01".into()), ..pickup("Dated") })
        .await?;
    ensure!(dated.preferred_date.as_deref() == Some("2025-06-01"));
    ensure!(dated.id != created.id, "ids must be unique");

    storage.delete_waste_pickup(&created.id).await?;
    storage.delete_waste_pickup(&dated.id).await?;
    Ok(())
}

async fn update_changes_only_given_fields(storage: &dyn Storage) -> Result<()> {
    let created = storage
        .create_waste_pickup(InsertWastePickup { preferred_date: Some("2025-07-15".into()), ..pickup("Update Me") })
        .await?;
    let updated = storage
        .update_waste_pickup(&created.id, UpdateWastePickup { location: Some("Kisumu".into()), ..Default::default() })
        .await?
        .context("record should exist")?;
    ensure!(updated.location == "Kisumu");
    ensure!(updated.id == created.id);
    ensure!(updated.full_name == created.full_name);
    ensure!(updated.waste_type == created.waste_type);
    ensure!(updated.preferred_date == created.preferred_date);
    ensure!(updated.created_at == created.created_at);

    let unchanged = storage
        .update_waste_pickup(&created.id, UpdateWastePickup::default())
        .await?
        .context("empty update returns the record")?;
    ensure!(unchanged == updated);

    storage.delete_waste_pickup(&created.id).await?;
    Ok(())
}

async fn update_clears_preferred_date_on_null(storage: &dyn Storage) -> Result<()> {
    let created = storage
        .create_waste_pickup(InsertWastePickup { preferred_date: Some("2025-08-01".into()), ..pickup("Clear Date") })
        .await?;
    let cleared = storage
        .update_waste_pickup(&created.id, UpdateWastePickup { preferred_date: Some(None), ..Default::default() })
        .await?
        .context("record should exist")?;
    ensure!(cleared.preferred_date.is_none());
    storage.delete_waste_pickup(&created.id).await?;
    Ok(())
}

async fn update_unknown_id_does_not_upsert(storage: &dyn Storage) -> Result<()> {
    let before = storage.count_waste_pickups().await?;
    let missing = unknown_id(storage);
    let res = storage
        .update_waste_pickup(&missing, UpdateWastePickup { waste_type: Some("Hazardous".into()), ..Default::default() })
        .await?;
    ensure!(res.is_none(), "update of unknown id must be absent");
    ensure!(storage.get_waste_pickup(&missing).await?.is_none());
    ensure!(storage.count_waste_pickups().await? <= before, "update must not insert");
    Ok(())
}

async fn delete_then_get_is_absent(storage: &dyn Storage) -> Result<()> {
    let created = storage.create_waste_pickup(pickup("Delete Me")).await?;
    ensure!(storage.delete_waste_pickup(&created.id).await?, "first delete removes");
    ensure!(storage.get_waste_pickup(&created.id).await?.is_none());
    ensure!(!storage.delete_waste_pickup(&created.id).await?, "second delete finds nothing");
    ensure!(!storage.delete_waste_pickup(&unknown_id(storage)).await?);
    Ok(())
}

async fn malformed_ids_are_absent(storage: &dyn Storage) -> Result<()> {
    for id in ["", "not-an-id", "zzzz"] {
        ensure!(storage.get_waste_pickup(id).await?.is_none());
        ensure!(storage.update_waste_pickup(id, UpdateWastePickup::default()).await?.is_none());
        ensure!(!storage.delete_waste_pickup(id).await?);
        ensure!(storage.get_user(id).await?.is_none());
    }
    Ok(())
}

async fn list_contains_each_record_once_newest_first(storage: &dyn Storage) -> Result<()> {
    let mut ids = Vec::new();
    for i in 0..3 {
        ids.push(storage.create_waste_pickup(pickup(&format!("List {i}"))).await?.id);
    }
    let deleted = storage.create_waste_pickup(pickup("List deleted")).await?.id;
    storage.delete_waste_pickup(&deleted).await?;

    let listed: Vec<String> = storage
        .get_all_waste_pickups()
        .await?
        .into_iter()
        .map(|p| p.id)
        .filter(|id| ids.contains(id) || *id == deleted)
        .collect();
    let expected: Vec<String> = ids.iter().rev().cloned().collect();
    ensure!(listed == expected, "listed {listed:?}, expected {expected:?}");

    for id in &ids {
        storage.delete_waste_pickup(id).await?;
    }
    Ok(())
}

async fn usernames_are_unique(storage: &dyn Storage) -> Result<()> {
    let username = format!("resident_{}", Uuid::new_v4().simple());
    let created = storage
        .create_user(InsertUser { username: username.clone(), password: "pw".into() })
        .await?;
    ensure!(!created.id.is_empty());
    ensure!(created.password == "pw", "password is stored as given");

    let by_id = storage.get_user(&created.id).await?;
    ensure!(by_id.as_ref() == Some(&created));
    let by_name = storage.get_user_by_username(&username).await?;
    ensure!(by_name.as_ref() == Some(&created));
    ensure!(storage.get_user_by_username("no-such-user").await?.is_none());

    match storage.create_user(InsertUser { username: username.clone(), password: "other".into() }).await {
        Err(StorageError::DuplicateUsername(name)) => ensure!(name == username),
        other => anyhow::bail!("expected duplicate username, got {other:?}"),
    }
    Ok(())
}

/// A well-formed id that names no record on this backend.
fn unknown_id(storage: &dyn Storage) -> String {
    match storage.backend_name() {
        "mongodb" => bson::oid::ObjectId::new().to_hex(),
        _ => Uuid::new_v4().to_string(),
    }
}
