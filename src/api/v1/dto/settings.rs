/*
 * Responsibility
 * - Profile / Site / Instrument の response DTO
 * - logo は bootstrap が作った base64 payload をそのまま返す
 */
use serde::Serialize;

use crate::repos::{InstrumentRecord, SiteRecord};
use crate::services::settings::Settings;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub project: String,
    pub affiliation: String,
    pub description: String,
    pub contact_email: Option<String>,
    pub secure_administration: bool,
    pub logo_base64: Option<String>,
}

impl From<&Settings> for ProfileResponse {
    fn from(settings: &Settings) -> Self {
        let p = &settings.profile;
        Self {
            project: p.project.clone(),
            affiliation: p.affiliation.clone(),
            description: p.description.clone(),
            contact_email: p.contact_email.clone(),
            secure_administration: p.secure_administration,
            logo_base64: settings.logo_base64.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SiteResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub lat: f64,
    pub lon: f64,
    pub elevation: f64,
}

impl From<&SiteRecord> for SiteResponse {
    fn from(site: &SiteRecord) -> Self {
        Self {
            id: site.id,
            name: site.name.clone(),
            description: site.description.clone(),
            lat: site.lat,
            lon: site.lon,
            elevation: site.elevation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InstrumentResponse {
    pub id: i64,
    pub name: String,
    pub site_id: Option<i64>,
    pub sample_rate_seconds: i32,
    pub is_active: bool,
}

impl From<&InstrumentRecord> for InstrumentResponse {
    fn from(instrument: &InstrumentRecord) -> Self {
        Self {
            id: instrument.id,
            name: instrument.name.clone(),
            site_id: instrument.site_id,
            sample_rate_seconds: instrument.sample_rate_seconds,
            is_active: instrument.is_active,
        }
    }
}
