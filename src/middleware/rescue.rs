//! Boundary responders for the two recoverable failure kinds.
//!
//! - Access denied: rewritten per negotiated format. HTML redirects to the
//!   about page with an alert; every structured format gets a bodiless 403.
//! - Mail transport authentication failure: logged, then a redirect to the
//!   about page naming the site contact.
//!
//! Each responder only reacts to its own `Rescue` marker; everything else
//! passes through untouched.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::format::ResponseFormat;
use crate::error::Rescue;
use crate::repos::{SettingsRecord, SettingsVariant};
use crate::state::AppState;

pub const ABOUT_PATH: &str = "/about";

pub const ACCESS_DENIED_ALERT: &str =
    "You don't have permission to access this page. Do you need to sign in?";

pub const MAIL_FAILURE_ALERT_PREFIX: &str =
    "Cannot send email, please contact the site administrator at: ";

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router
        .layer(middleware::from_fn(access_denied))
        .layer(middleware::from_fn_with_state(state, mail_transport_failure))
}

async fn access_denied(req: Request<Body>, next: Next) -> Response {
    let format = ResponseFormat::negotiate(&req);
    let response = next.run(req).await;

    match response.extensions().get::<Rescue>() {
        Some(Rescue::AccessDenied) => deny(format),
        _ => response,
    }
}

/// Terminal response for an access denial in `format`.
pub fn deny(format: ResponseFormat) -> Response {
    match format {
        ResponseFormat::Html => redirect_to_about(ACCESS_DENIED_ALERT),
        structured => (
            StatusCode::FORBIDDEN,
            [(header::CONTENT_TYPE, structured.content_type())],
        )
            .into_response(),
    }
}

async fn mail_transport_failure(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let response = next.run(req).await;

    let detail = match response.extensions().get::<Rescue>() {
        Some(Rescue::MailAuthentication { detail }) => detail.clone(),
        _ => return response,
    };
    tracing::warn!(error = %detail, "mail transport authentication failed");

    // Read fresh: the contact may have changed since bootstrap.
    let contact_email = match state.settings.first(SettingsVariant::Profile).await {
        Ok(Some(SettingsRecord::Profile(profile))) => profile.contact_email,
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(error = ?err, "profile lookup failed while reporting mail failure");
            None
        }
    };

    redirect_to_about(&format!(
        "{MAIL_FAILURE_ALERT_PREFIX}{}",
        contact_email.unwrap_or_default()
    ))
}

/// `302 Found` to the about page with `alert` in the query string.
pub fn redirect_to_about(alert: &str) -> Response {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("alert", alert)
        .finish();

    (
        StatusCode::FOUND,
        [(header::LOCATION, format!("{ABOUT_PATH}?{query}"))],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert_of(response: &Response) -> Option<String> {
        let location = response.headers().get(header::LOCATION)?.to_str().ok()?;
        let (path, query) = location.split_once('?')?;
        assert_eq!(path, ABOUT_PATH);
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "alert")
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn html_denial_redirects_with_alert() {
        let response = deny(ResponseFormat::Html);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(alert_of(&response).as_deref(), Some(ACCESS_DENIED_ALERT));
    }

    #[test]
    fn structured_denials_are_bodiless_403s() {
        for format in [
            ResponseFormat::SensorMl,
            ResponseFormat::Json,
            ResponseFormat::GeoJson,
            ResponseFormat::Js,
            ResponseFormat::Csv,
            ResponseFormat::Xml,
        ] {
            let response = deny(format);
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            assert_eq!(
                response.headers().get(header::CONTENT_TYPE).unwrap(),
                format.content_type()
            );
            assert!(response.headers().get(header::LOCATION).is_none());
        }
    }
}
