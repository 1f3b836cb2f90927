pub mod seeder;

pub use seeder::{SeedError, SingletonSeeder};

use crate::repos::{InstrumentRecord, ProfileRecord, SiteRecord};

/// The seeded global settings as seen by a single request.
///
/// `profile.secure_administration` is forced on by bootstrap and
/// `logo_base64` is derived from `profile.logo`; neither is written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub profile: ProfileRecord,
    pub site: SiteRecord,
    pub instrument: InstrumentRecord,
    pub logo_base64: Option<String>,
}
