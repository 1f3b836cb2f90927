/*
 * Responsibility
 * - GET /about: rescue の redirect 先
 * - alert (query) / profile / RequestContext を返す。描画 (template) はしない
 */
use axum::{Json, extract::Query};
use serde::{Deserialize, Serialize};

use crate::api::v1::extractors::{CurrentContext, CurrentIdentity, CurrentSettings};
use crate::services::build_info::RequestContext;

#[derive(Debug, Deserialize)]
pub struct AboutQuery {
    pub alert: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AboutResponse {
    pub alert: Option<String>,
    pub project: String,
    pub affiliation: String,
    pub description: String,
    pub logo_base64: Option<String>,
    pub signed_in: bool,
    pub build: RequestContext,
}

pub async fn about(
    Query(query): Query<AboutQuery>,
    CurrentIdentity(identity): CurrentIdentity,
    CurrentSettings(settings): CurrentSettings,
    CurrentContext(build): CurrentContext,
) -> Json<AboutResponse> {
    Json(AboutResponse {
        alert: query.alert,
        project: settings.profile.project,
        affiliation: settings.profile.affiliation,
        description: settings.profile.description,
        logo_base64: settings.logo_base64,
        signed_in: !identity.is_guest(),
        build,
    })
}
