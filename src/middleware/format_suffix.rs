//! Path format suffix (`/api/v1/archive.csv`), handled before routing.
//!
//! Routes are declared without a suffix. A recognised suffix on the last path
//! segment is removed from the URI and recorded as a `PathFormat` extension,
//! where `ResponseFormat::negotiate` picks it up ahead of `?format=` and
//! `Accept`. Unrecognised suffixes are left alone and route (or 404) as-is.

use axum::{
    Router,
    body::Body,
    http::{Request, Uri, uri::PathAndQuery},
};
use tower::ServiceBuilder;

use crate::api::format::{PathFormat, ResponseFormat};

/// Wraps `router` so the rewrite happens before it matches a route.
///
/// `Router::layer` middleware runs after routing, so the rewrite sits in an
/// outer router's fallback instead.
pub fn apply(router: Router) -> Router {
    Router::new().fallback_service(
        ServiceBuilder::new()
            .map_request(strip_format_suffix)
            .service(router),
    )
}

fn strip_format_suffix(mut req: Request<Body>) -> Request<Body> {
    let Some((stem, format)) = ResponseFormat::split_path_suffix(req.uri().path()) else {
        return req;
    };

    let path_and_query = match req.uri().query() {
        Some(query) => format!("{stem}?{query}"),
        None => stem.to_string(),
    };

    match rewrite_path(req.uri(), path_and_query) {
        Some(uri) => {
            *req.uri_mut() = uri;
            req.extensions_mut().insert(PathFormat(format));
        }
        None => tracing::debug!(uri = %req.uri(), "format suffix left in place"),
    }
    req
}

fn rewrite_path(uri: &Uri, path_and_query: String) -> Option<Uri> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}
