use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod secure;
pub mod waste_pickups;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses(
        (status = 200, description = "Service is up", body = crate::openapi::HealthResponse),
        (status = 500, description = "Storage unreachable", body = crate::openapi::MessageDoc)
    )
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<Health>, ApiError> {
    let pickups = state.pickups.count().await?;
    Ok(Json(Health { status: "ok", backend: state.pickups.backend_name().to_string(), pickups }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router around an already constructed state.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    // Authentication is handled by the external identity provider in front of
    // this service; handlers only read the identity it forwards.
    let api = Router::new()
        .route("/api/secure-test", get(secure::secure_test))
        .route(
            "/api/waste-pickups",
            get(waste_pickups::list).post(waste_pickups::create),
        )
        .route(
            "/api/waste-pickups/:id",
            get(waste_pickups::get)
                .patch(waste_pickups::update)
                .delete(waste_pickups::delete),
        );

    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request with method and path, INFO level
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency on response
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and friends at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
