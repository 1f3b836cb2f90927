use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::archive::ArchiveConfig;
use crate::services::auth::Identity;
use crate::services::build_info::RequestContext;
use crate::services::settings::Settings;
use crate::state::AppState;

pub struct CurrentIdentity(pub Identity);

pub struct CurrentSettings(pub Settings);

pub struct CurrentContext(pub RequestContext);

pub struct CurrentArchive(pub Arc<ArchiveConfig>);

fn published<T>(parts: &Parts) -> Result<T, AppError>
where
    T: Clone + Send + Sync + 'static,
{
    parts.extensions.get::<T>().cloned().ok_or_else(|| {
        tracing::error!(
            missing = std::any::type_name::<T>(),
            "request bootstrap did not run for this route"
        );
        AppError::Internal
    })
}

impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        published(parts).map(CurrentIdentity)
    }
}

impl FromRequestParts<AppState> for CurrentSettings {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        published(parts).map(CurrentSettings)
    }
}

impl FromRequestParts<AppState> for CurrentContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        published(parts).map(CurrentContext)
    }
}

impl FromRequestParts<AppState> for CurrentArchive {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        published(parts).map(CurrentArchive)
    }
}
