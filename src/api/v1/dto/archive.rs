use serde::Serialize;

use crate::services::archive::ArchiveConfig;

/// Archive configuration as exposed to administrators. The password is never
/// echoed back.
#[derive(Debug, Serialize)]
pub struct ArchiveResponse {
    pub name: String,
    pub base_url: String,
    pub username: String,
    pub has_password: bool,
    pub enabled: bool,
    pub send_frequency: String,
}

impl From<&ArchiveConfig> for ArchiveResponse {
    fn from(config: &ArchiveConfig) -> Self {
        Self {
            name: config.name.clone(),
            base_url: config.base_url.clone(),
            username: config.username.clone(),
            has_password: config.password.as_deref().is_some_and(|p| !p.is_empty()),
            enabled: config.enabled,
            send_frequency: config.send_frequency.clone(),
        }
    }
}
