//! CORS header for every response.
//!
//! Applied outermost, after `middleware::http`, so the header is also present on
//! body-limit, timeout and layer-error responses as well as bootstrap failures
//! and rescued denials.
//!
//! Policy:
//! - `Access-Control-Allow-Origin: *`, unconditionally, in every environment.
//! - No credentials, no preflight handling.

use axum::Router;
use axum::http::{HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;

pub fn apply(router: Router) -> Router {
    router.layer(SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    ))
}
