/*
 * Responsibility
 * - POST /notifications/test: 管理者がメール送信経路を確認するための test mail
 * - 宛先は profile の contact_email、無ければ操作者本人の email
 * - transport 認証失敗は AppError::MailAuthentication として middleware::rescue に任せる
 */
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::{
    api::v1::extractors::{CurrentIdentity, CurrentSettings},
    error::AppError,
    middleware::rescue::ABOUT_PATH,
    services::{
        auth::{Ability, Action, Resource},
        mail::OutgoingMail,
    },
    state::AppState,
};

pub async fn send_test(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    CurrentSettings(settings): CurrentSettings,
) -> Result<(StatusCode, Json<Value>), AppError> {
    Ability::new(&identity, settings.profile.secure_administration)
        .authorize(Action::Manage, Resource::Notification)?;

    let to = settings
        .profile
        .contact_email
        .clone()
        .or_else(|| identity.email().map(String::from))
        .ok_or_else(|| AppError::bad_request("NO_RECIPIENT", "no contact email configured"))?;

    let link = state
        .mail_defaults
        .url_for(ABOUT_PATH)
        .unwrap_or_else(|| ABOUT_PATH.to_string());

    let mail = OutgoingMail {
        to: to.clone(),
        subject: format!("{}: test notification", settings.profile.project),
        body: format!("Mail delivery is working. Portal: {link}"),
    };

    state.mailer.deliver(&mail).await?;

    Ok((StatusCode::ACCEPTED, Json(json!({"status": "sent", "to": to}))))
}
