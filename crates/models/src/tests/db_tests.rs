use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::schema::{InsertUser, InsertWastePickup, UpdateWastePickup};
use crate::{db, user, waste_pickup};

/// Connect and migrate, or `None` when no database is configured.
async fn setup_test_db() -> Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("skip: DATABASE_URL not set");
        return Ok(None);
    };
    let db = db::connect(&url, 5).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

#[tokio::test]
async fn test_waste_pickup_crud() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let input = InsertWastePickup {
        full_name: "Jane Doe".into(),
        location: "Nairobi".into(),
        waste_type: "Organic".into(),
        preferred_date: Some(String::new()),
    };
    let created = waste_pickup::create(&db, &input).await?;
    assert_eq!(created.preferred_date, None);

    let found = waste_pickup::find(&db, created.id).await?;
    assert_eq!(found.as_ref(), Some(&created));

    let updated = waste_pickup::update(&db, created.id, UpdateWastePickup { waste_type: Some("Hazardous".into()), ..Default::default() })
        .await?
        .expect("row exists");
    assert_eq!(updated.waste_type, "Hazardous");
    assert_eq!(updated.location, "Nairobi");
    assert_eq!(updated.created_at, created.created_at);

    assert!(waste_pickup::update(&db, Uuid::new_v4(), UpdateWastePickup::default()).await?.is_none());

    assert!(waste_pickup::hard_delete(&db, created.id).await?);
    assert!(!waste_pickup::hard_delete(&db, created.id).await?);
    assert!(waste_pickup::find(&db, created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_update_of_row_deleted_after_read_is_absent() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let input = InsertWastePickup {
        full_name: "Jane Doe".into(),
        location: "Nairobi".into(),
        waste_type: "Organic".into(),
        preferred_date: None,
    };
    let created = waste_pickup::create(&db, &input).await?;
    let read = waste_pickup::find(&db, created.id).await?.expect("row exists");
    assert!(waste_pickup::hard_delete(&db, created.id).await?);

    let res = waste_pickup::apply_update(&db, read, UpdateWastePickup { location: Some("Kisumu".into()), ..Default::default() }).await?;
    assert!(res.is_none());
    assert!(waste_pickup::find(&db, created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_username_unique_constraint() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let username = format!("user_{}", Uuid::new_v4());
    let input = InsertUser { username: username.clone(), password: "pw".into() };
    let created = user::create(&db, &input).await?;
    assert_eq!(user::find_by_username(&db, &username).await?.map(|u| u.id), Some(created.id));

    match user::create(&db, &input).await {
        Err(ModelError::Conflict(_)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
    user::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}
