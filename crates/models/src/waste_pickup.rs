use sea_orm::{entity::prelude::*, DatabaseConnection, PaginatorTrait, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::schema::{self, InsertWastePickup, UpdateWastePickup};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "waste_pickups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    pub location: String,
    pub waste_type: String,
    pub preferred_date: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for schema::WastePickup {
    fn from(m: Model) -> Self {
        Self {
            id: m.id.to_string(),
            full_name: m.full_name,
            location: m.location,
            waste_type: m.waste_type,
            preferred_date: schema::normalize_preferred_date(m.preferred_date),
            created_at: m.created_at,
        }
    }
}

/// Insert a validated pickup with a fresh v4 id and the current time.
pub async fn create(db: &DatabaseConnection, input: &InsertWastePickup) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(input.full_name.clone()),
        location: Set(input.location.clone()),
        waste_type: Set(input.waste_type.clone()),
        preferred_date: Set(schema::normalize_preferred_date(input.preferred_date.clone())),
        created_at: Set(Utc::now()),
    };
    Ok(am.insert(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// All pickups, newest first.
pub async fn list_newest_first(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_desc(Column::CreatedAt).all(db).await?)
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, ModelError> {
    Ok(Entity::find().count(db).await?)
}

/// Merge the provided fields; `Ok(None)` when no row has this id.
pub async fn update(db: &DatabaseConnection, id: Uuid, update: UpdateWastePickup) -> Result<Option<Model>, ModelError> {
    let Some(found) = Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    if update.is_empty() {
        return Ok(Some(found));
    }
    apply_update(db, found, update).await
}

/// Write `update` over a previously read row. A row deleted in between is
/// reported as absent.
pub(crate) async fn apply_update(db: &DatabaseConnection, found: Model, update: UpdateWastePickup) -> Result<Option<Model>, ModelError> {
    let mut am: ActiveModel = found.into();
    if let Some(name) = update.full_name { am.full_name = Set(name); }
    if let Some(location) = update.location { am.location = Set(location); }
    if let Some(kind) = update.waste_type { am.waste_type = Set(kind); }
    if let Some(date) = update.preferred_date { am.preferred_date = Set(schema::normalize_preferred_date(date)); }
    match am.update(db).await {
        Ok(updated) => Ok(Some(updated)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Returns whether a row was removed.
pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
