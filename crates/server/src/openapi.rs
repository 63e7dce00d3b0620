use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String, pub backend: String, pub pickups: usize }

#[derive(Serialize, ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertWastePickupDoc {
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "Nairobi")]
    pub location: String,
    #[schema(example = "Organic")]
    pub waste_type: String,
    #[schema(example = "2025-03-14")]
    pub preferred_date: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWastePickupDoc {
    pub full_name: Option<String>,
    pub location: Option<String>,
    pub waste_type: Option<String>,
    /// `null` or `""` clears the preferred date.
    pub preferred_date: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WastePickupDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub location: String,
    pub waste_type: String,
    pub preferred_date: Option<String>,
    #[schema(example = "2025-03-01T08:30:00Z")]
    pub created_at: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::secure::secure_test,
        crate::routes::waste_pickups::create,
        crate::routes::waste_pickups::list,
        crate::routes::waste_pickups::get,
        crate::routes::waste_pickups::update,
        crate::routes::waste_pickups::delete,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            InsertWastePickupDoc,
            UpdateWastePickupDoc,
            WastePickupDoc,
            crate::routes::secure::SecureTestResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "waste-pickups")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_pickup_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for p in ["/health", "/api/secure-test", "/api/waste-pickups", "/api/waste-pickups/{id}"] {
            assert!(paths.iter().any(|k| k.as_str() == p), "missing {p}");
        }
    }
}
