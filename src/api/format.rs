//! Negotiated response format.
//!
//! Resolution order: path suffix (`/api/v1/archive.csv`), then
//! `?format=<token>`, then the first recognised media type in `Accept`,
//! then HTML. Unrecognised values fall back to HTML.
//!
//! The suffix is removed before routing (`middleware::format_suffix`) and
//! travels as a `PathFormat` request extension.

use axum::http::{HeaderMap, Request, Uri, header};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    SensorMl,
    Json,
    GeoJson,
    Js,
    Csv,
    Xml,
}

/// Format named by a stripped path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathFormat(pub ResponseFormat);

impl ResponseFormat {
    pub fn negotiate<B>(req: &Request<B>) -> Self {
        req.extensions()
            .get::<PathFormat>()
            .map(|PathFormat(format)| *format)
            .or_else(|| Self::from_uri_and_accept(req.uri(), req.headers()))
            .unwrap_or(Self::Html)
    }

    fn from_uri_and_accept(uri: &Uri, headers: &HeaderMap) -> Option<Self> {
        Self::from_query(uri.query()).or_else(|| Self::from_accept(headers))
    }

    /// `("/api/v1/archive", Csv)` for `"/api/v1/archive.csv"`; `None` when the
    /// last segment has no recognised suffix.
    pub fn split_path_suffix(path: &str) -> Option<(&str, Self)> {
        let (stem, suffix) = path.rsplit_once('.')?;
        if suffix.contains('/') || stem.is_empty() || stem.ends_with('/') {
            return None;
        }
        Self::from_token(suffix).map(|format| (stem, format))
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "html" => Some(Self::Html),
            "sensorml" => Some(Self::SensorMl),
            "json" => Some(Self::Json),
            "geojson" => Some(Self::GeoJson),
            "js" => Some(Self::Js),
            "csv" => Some(Self::Csv),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type.trim().to_ascii_lowercase().as_str() {
            "text/html" | "application/xhtml+xml" => Some(Self::Html),
            "text/sensorml" | "application/sensorml+xml" => Some(Self::SensorMl),
            "application/json" => Some(Self::Json),
            "application/geo+json" | "application/vnd.geo+json" => Some(Self::GeoJson),
            "text/js" | "text/javascript" | "application/javascript" => Some(Self::Js),
            "text/csv" => Some(Self::Csv),
            "text/xml" | "application/xml" => Some(Self::Xml),
            _ => None,
        }
    }

    fn from_query(query: Option<&str>) -> Option<Self> {
        url::form_urlencoded::parse(query?.as_bytes())
            .find(|(key, _)| key == "format")
            .and_then(|(_, value)| Self::from_token(&value))
    }

    fn from_accept(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .filter_map(|entry| entry.split(';').next())
            .find_map(Self::from_media_type)
    }

    /// Content type of a bodiless 403 in this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::SensorMl => "text/sensorml",
            Self::Json | Self::GeoJson => "application/json",
            Self::Js => "text/js",
            Self::Csv => "text/csv",
            Self::Xml => "text/xml",
        }
    }
}
