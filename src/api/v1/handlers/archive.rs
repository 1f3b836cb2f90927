/*
 * Responsibility
 * - GET /archive: このリクエストで読み直した archive config の snapshot (admin のみ)
 */
use axum::Json;

use crate::{
    api::v1::{
        dto::archive::ArchiveResponse,
        extractors::{CurrentArchive, CurrentIdentity, CurrentSettings},
    },
    error::AppError,
    services::auth::{Ability, Action, Resource},
};

pub async fn get_archive(
    CurrentIdentity(identity): CurrentIdentity,
    CurrentSettings(settings): CurrentSettings,
    CurrentArchive(archive): CurrentArchive,
) -> Result<Json<ArchiveResponse>, AppError> {
    Ability::new(&identity, settings.profile.secure_administration)
        .authorize(Action::Read, Resource::ArchiveConfig)?;

    Ok(Json(ArchiveResponse::from(archive.as_ref())))
}
