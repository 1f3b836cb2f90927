//! Per-request bootstrap, run before every action.
//!
//! Steps, in order:
//! 1. default mail link host from the request `Host`
//! 2. `RequestContext` display metadata
//! 3. `Access-Control-Allow-Origin: *` (see `middleware::cors`, outermost)
//! 4. seed Profile, Site, Instrument
//! 5. force `secure_administration` on the request's profile
//! 6. logo payload from the profile
//! 7. identity (token, then session, then guest)
//! 8. reload the archive configuration
//!
//! The first failing step ends the request with its error response; the action
//! never runs on a partial bootstrap.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::ProfileRecord;
use crate::services::auth::CredentialParams;
use crate::services::build_info::RequestContext;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, bootstrap_middleware))
}

async fn bootstrap_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match bootstrap(&state, &mut req).await {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

async fn bootstrap(state: &AppState, req: &mut Request<Body>) -> Result<(), AppError> {
    if let Some(host) = request_host(req) {
        state.mail_defaults.set_host(&host);
    }

    let context = RequestContext::from_env(state.app_env, state.started_at.elapsed()).await;

    // Step 3 is a response layer, see `middleware::cors`.

    let mut settings = state.seeder.ensure_all().await?;

    settings.profile.secure_administration = true;

    settings.logo_base64 = logo_payload(&settings.profile);

    let params = CredentialParams::from_query(req.uri().query());
    let session_id = session_id(req.headers(), &state.session_cookie);
    let identity = state.resolver.resolve(&params, session_id, Utc::now()).await?;

    let archive = state.archive.load().await?;

    tracing::debug!(
        user_id = ?identity.user_id(),
        via = ?identity.auth_method(),
        "request bootstrapped"
    );

    let extensions = req.extensions_mut();
    extensions.insert(context);
    extensions.insert(settings);
    extensions.insert(identity);
    extensions.insert(archive);

    Ok(())
}

// `host[:port]`, from `Host` or the absolute request URI.
fn request_host(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().authority().map(|a| a.to_string()))
}

fn logo_payload(profile: &ProfileRecord) -> Option<String> {
    profile.logo.as_deref().map(|logo| STANDARD.encode(logo))
}

fn session_id(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
