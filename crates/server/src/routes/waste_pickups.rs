use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use common::types::MessageResponse;
use models::{InsertWastePickup, UpdateWastePickup, WastePickup};
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;

#[utoipa::path(
    post, path = "/api/waste-pickups", tag = "waste-pickups",
    request_body = crate::openapi::InsertWastePickupDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::WastePickupDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::MessageDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<InsertWastePickup>, JsonRejection>,
) -> Result<(StatusCode, Json<WastePickup>), ApiError> {
    let Json(input) = payload?;
    let pickup = state.pickups.create(input).await?;
    Ok((StatusCode::CREATED, Json(pickup)))
}

#[utoipa::path(
    get, path = "/api/waste-pickups", tag = "waste-pickups",
    responses(
        (status = 200, description = "All pickups, newest first", body = [crate::openapi::WastePickupDoc])
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<WastePickup>>, ApiError> {
    let pickups = state.pickups.list().await?;
    info!(count = pickups.len(), "list waste pickups");
    Ok(Json(pickups))
}

#[utoipa::path(
    get, path = "/api/waste-pickups/{id}", tag = "waste-pickups",
    params(("id" = String, Path, description = "Pickup ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::WastePickupDoc),
        (status = 404, description = "Not Found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<WastePickup>, ApiError> {
    Ok(Json(state.pickups.get(&id).await?))
}

#[utoipa::path(
    patch, path = "/api/waste-pickups/{id}", tag = "waste-pickups",
    params(("id" = String, Path, description = "Pickup ID")),
    request_body = crate::openapi::UpdateWastePickupDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::WastePickupDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateWastePickup>, JsonRejection>,
) -> Result<Json<WastePickup>, ApiError> {
    let Json(update) = payload?;
    Ok(Json(state.pickups.update(&id, update).await?))
}

#[utoipa::path(
    delete, path = "/api/waste-pickups/{id}", tag = "waste-pickups",
    params(("id" = String, Path, description = "Pickup ID")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<MessageResponse>, ApiError> {
    state.pickups.delete(&id).await?;
    Ok(Json(MessageResponse::new("Pickup deleted successfully")))
}
