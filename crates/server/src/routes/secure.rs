use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

/// Header carrying the subject the identity provider authenticated.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity used when no provider sits in front of the service (development).
pub const DEV_USER: &str = "dev-user";

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecureTestResponse {
    pub message: String,
    pub user_id: String,
}

pub fn forwarded_user_id(headers: &HeaderMap) -> String {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEV_USER)
        .to_string()
}

#[utoipa::path(
    get, path = "/api/secure-test", tag = "auth",
    responses((status = 200, description = "Echo the forwarded identity", body = SecureTestResponse))
)]
pub async fn secure_test(headers: HeaderMap) -> Json<SecureTestResponse> {
    Json(SecureTestResponse {
        message: "This is a protected route".into(),
        user_id: forwarded_user_id(&headers),
    })
}
