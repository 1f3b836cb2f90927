/*
 * Responsibility
 * - Profile / Site / Instrument が必ず 1 件存在することを保証する (idempotent)
 * - check-then-create は atomic ではないため、作成競合 (RepoError::Conflict) は
 *   「他のリクエストが先に作った」とみなして再読込する
 */
use std::sync::Arc;

use thiserror::Error;

use crate::repos::{
    InstrumentRecord, ProfileRecord, RepoError, SettingsRecord, SettingsStore, SettingsVariant,
    SiteRecord,
};
use crate::services::settings::Settings;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("{} record still missing after seeding", .0.as_str())]
    Missing(SettingsVariant),
    #[error("store returned a {} record for {}", .found.as_str(), .expected.as_str())]
    UnexpectedRecord {
        expected: SettingsVariant,
        found: SettingsVariant,
    },
}

#[derive(Clone)]
pub struct SingletonSeeder {
    store: Arc<dyn SettingsStore>,
}

impl SingletonSeeder {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Returns the variant's record, creating the canonical default first when
    /// none exists. A call against a seeded store is a single read.
    pub async fn ensure_default(
        &self,
        variant: SettingsVariant,
    ) -> Result<SettingsRecord, SeedError> {
        if let Some(record) = self.store.first(variant).await? {
            return Ok(record);
        }

        match self.store.initialize_default(variant).await {
            Ok(()) => tracing::info!(variant = variant.as_str(), "seeded default settings record"),
            Err(RepoError::Conflict) => {
                tracing::debug!(
                    variant = variant.as_str(),
                    "settings record seeded concurrently, rereading"
                );
            }
            Err(e) => return Err(e.into()),
        }

        self.store
            .first(variant)
            .await?
            .ok_or(SeedError::Missing(variant))
    }

    /// Seeds Profile, Site and Instrument, in that order.
    pub async fn ensure_all(&self) -> Result<Settings, SeedError> {
        let profile = self.profile().await?;
        let site = self.site().await?;
        let instrument = self.instrument().await?;

        Ok(Settings {
            profile,
            site,
            instrument,
            logo_base64: None,
        })
    }

    async fn profile(&self) -> Result<ProfileRecord, SeedError> {
        match self.ensure_default(SettingsVariant::Profile).await? {
            SettingsRecord::Profile(p) => Ok(p),
            other => Err(unexpected(SettingsVariant::Profile, &other)),
        }
    }

    async fn site(&self) -> Result<SiteRecord, SeedError> {
        match self.ensure_default(SettingsVariant::Site).await? {
            SettingsRecord::Site(s) => Ok(s),
            other => Err(unexpected(SettingsVariant::Site, &other)),
        }
    }

    async fn instrument(&self) -> Result<InstrumentRecord, SeedError> {
        match self.ensure_default(SettingsVariant::Instrument).await? {
            SettingsRecord::Instrument(i) => Ok(i),
            other => Err(unexpected(SettingsVariant::Instrument, &other)),
        }
    }
}

fn unexpected(expected: SettingsVariant, found: &SettingsRecord) -> SeedError {
    SeedError::UnexpectedRecord {
        expected,
        found: found.variant(),
    }
}
