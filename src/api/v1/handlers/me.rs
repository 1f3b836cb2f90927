/*
 * Responsibility
 * - GET /me: bootstrap が決めた Identity をそのまま返す (guest も含む)
 */
use axum::Json;

use crate::api::v1::{dto::identity::IdentityResponse, extractors::CurrentIdentity};

pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<IdentityResponse> {
    Json(IdentityResponse::from(&identity))
}
