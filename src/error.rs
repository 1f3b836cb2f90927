/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / seeding / archive config / mail の失敗を統一的に変換
 * - AccessDenied と mail 認証失敗は response extensions に Rescue を付け、
 *   応答形式ごとの書き換えは middleware::rescue に任せる
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::archive::ArchiveConfigError;
use crate::services::mail::MailError;
use crate::services::settings::SeedError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("access denied")]
    AccessDenied,
    #[error("mail transport authentication failed")]
    MailAuthentication { detail: String },
    #[error("internal server error")]
    Internal,
}

/// Marker left in the extensions of an error response so the boundary
/// responders can recognise it after the handler has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rescue {
    AccessDenied,
    MailAuthentication { detail: String },
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rescue = match &self {
            AppError::AccessDenied => Some(Rescue::AccessDenied),
            AppError::MailAuthentication { detail } => Some(Rescue::MailAuthentication {
                detail: detail.clone(),
            }),
            _ => None,
        };

        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::AccessDenied => (StatusCode::FORBIDDEN, "FORBIDDEN", "forbidden".into()),
            AppError::MailAuthentication { .. } | AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(rescue) = rescue {
            response.extensions_mut().insert(rescue);
        }
        response
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        tracing::error!(error = ?e, "repository failure");
        AppError::Internal
    }
}

impl From<SeedError> for AppError {
    fn from(e: SeedError) -> Self {
        tracing::error!(error = %e, "settings seeding failed");
        AppError::Internal
    }
}

impl From<ArchiveConfigError> for AppError {
    fn from(e: ArchiveConfigError) -> Self {
        tracing::error!(error = %e, "archive configuration could not be loaded");
        AppError::Internal
    }
}

impl From<MailError> for AppError {
    fn from(e: MailError) -> Self {
        match e {
            MailError::Authentication(detail) => AppError::MailAuthentication { detail },
            MailError::Transport(detail) => {
                tracing::error!(error = %detail, "mail delivery failed");
                AppError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_denied_is_tagged_for_the_responder() {
        let response = AppError::AccessDenied.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.extensions().get::<Rescue>(),
            Some(&Rescue::AccessDenied)
        );
    }

    #[test]
    fn mail_authentication_failure_is_tagged_separately() {
        let err: AppError = MailError::Authentication("535 bad credentials".into()).into();
        let response = err.into_response();
        assert_eq!(
            response.extensions().get::<Rescue>(),
            Some(&Rescue::MailAuthentication {
                detail: "535 bad credentials".into()
            })
        );
    }

    #[test]
    fn other_errors_are_untagged() {
        let transport: AppError = MailError::Transport("connection refused".into()).into();
        for err in [AppError::Internal, AppError::not_found("instrument"), transport] {
            assert!(err.into_response().extensions().get::<Rescue>().is_none());
        }
    }
}
