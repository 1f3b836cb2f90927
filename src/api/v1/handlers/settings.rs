/*
 * Responsibility
 * - global settings (profile / site / instrument) の参照 handler
 * - 値は bootstrap が seeding 済みのものを extensions から受け取る (DB を再度読まない)
 */
use axum::Json;

use crate::{
    api::v1::{
        dto::settings::{InstrumentResponse, ProfileResponse, SiteResponse},
        extractors::{CurrentIdentity, CurrentSettings},
    },
    error::AppError,
    services::auth::{Ability, Action, Resource},
};

pub async fn get_profile(
    CurrentIdentity(identity): CurrentIdentity,
    CurrentSettings(settings): CurrentSettings,
) -> Result<Json<ProfileResponse>, AppError> {
    Ability::new(&identity, settings.profile.secure_administration)
        .authorize(Action::Read, Resource::Profile)?;

    Ok(Json(ProfileResponse::from(&settings)))
}

pub async fn get_site(
    CurrentIdentity(identity): CurrentIdentity,
    CurrentSettings(settings): CurrentSettings,
) -> Result<Json<SiteResponse>, AppError> {
    Ability::new(&identity, settings.profile.secure_administration)
        .authorize(Action::Read, Resource::Site)?;

    Ok(Json(SiteResponse::from(&settings.site)))
}

pub async fn get_instrument(
    CurrentIdentity(identity): CurrentIdentity,
    CurrentSettings(settings): CurrentSettings,
) -> Result<Json<InstrumentResponse>, AppError> {
    Ability::new(&identity, settings.profile.secure_administration)
        .authorize(Action::Read, Resource::Instrument)?;

    Ok(Json(InstrumentResponse::from(&settings.instrument)))
}
