/*
 * Responsibility
 * - profiles / sites / instruments (global settings singleton) 向け SQLx 操作
 * - first() と initialize_default() だけを提供する (CRUD は持たない)
 * - 各テーブルは UNIQUE(singleton) 制約を持ち、二重作成は RepoError::Conflict になる
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

/// The kinds of process-wide settings rows. Seeding happens in `ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsVariant {
    Profile,
    Site,
    Instrument,
}

impl SettingsVariant {
    pub const ALL: [SettingsVariant; 3] = [Self::Profile, Self::Site, Self::Instrument];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Site => "site",
            Self::Instrument => "instrument",
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProfileRecord {
    pub id: i64,
    pub project: String,
    pub affiliation: String,
    pub description: String,
    pub contact_email: Option<String>,
    pub logo: Option<Vec<u8>>,
    pub secure_administration: bool,
}

impl ProfileRecord {
    pub const DEFAULT_PROJECT: &'static str = "Sensor Portal";
    pub const DEFAULT_AFFILIATION: &'static str = "Unaffiliated";
    pub const DEFAULT_DESCRIPTION: &'static str = "A portal for real-time sensor data.";
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SiteRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub lat: f64,
    pub lon: f64,
    pub elevation: f64,
}

impl SiteRecord {
    pub const DEFAULT_NAME: &'static str = "Default Site";
    pub const DEFAULT_DESCRIPTION: &'static str = "Initial site";
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct InstrumentRecord {
    pub id: i64,
    pub name: String,
    pub site_id: Option<i64>,
    pub sample_rate_seconds: i32,
    pub is_active: bool,
}

impl InstrumentRecord {
    pub const DEFAULT_NAME: &'static str = "Default Instrument";
    pub const DEFAULT_SAMPLE_RATE_SECONDS: i32 = 60;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsRecord {
    Profile(ProfileRecord),
    Site(SiteRecord),
    Instrument(InstrumentRecord),
}

impl SettingsRecord {
    pub fn variant(&self) -> SettingsVariant {
        match self {
            Self::Profile(_) => SettingsVariant::Profile,
            Self::Site(_) => SettingsVariant::Site,
            Self::Instrument(_) => SettingsVariant::Instrument,
        }
    }
}

/// Singleton-record provider.
///
/// `initialize_default` must fail with `RepoError::Conflict` when a row of the
/// variant already exists; the seeder relies on that to resolve races.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn first(&self, variant: SettingsVariant) -> RepoResult<Option<SettingsRecord>>;

    async fn initialize_default(&self, variant: SettingsVariant) -> RepoResult<()>;
}

#[derive(Clone, Debug)]
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn first(&self, variant: SettingsVariant) -> RepoResult<Option<SettingsRecord>> {
        let record = match variant {
            SettingsVariant::Profile => sqlx::query_as::<_, ProfileRecord>(
                r#"
                SELECT id, project, affiliation, description, contact_email, logo, secure_administration
                FROM profiles
                ORDER BY id
                LIMIT 1
                "#,
            )
            .fetch_optional(&self.pool)
            .await?
            .map(SettingsRecord::Profile),
            SettingsVariant::Site => sqlx::query_as::<_, SiteRecord>(
                r#"
                SELECT id, name, description, lat, lon, elevation
                FROM sites
                ORDER BY id
                LIMIT 1
                "#,
            )
            .fetch_optional(&self.pool)
            .await?
            .map(SettingsRecord::Site),
            SettingsVariant::Instrument => sqlx::query_as::<_, InstrumentRecord>(
                r#"
                SELECT id, name, site_id, sample_rate_seconds, is_active
                FROM instruments
                ORDER BY id
                LIMIT 1
                "#,
            )
            .fetch_optional(&self.pool)
            .await?
            .map(SettingsRecord::Instrument),
        };

        Ok(record)
    }

    async fn initialize_default(&self, variant: SettingsVariant) -> RepoResult<()> {
        let query = match variant {
            SettingsVariant::Profile => sqlx::query(
                r#"
                INSERT INTO profiles (project, affiliation, description, secure_administration)
                VALUES ($1, $2, $3, true)
                "#,
            )
            .bind(ProfileRecord::DEFAULT_PROJECT)
            .bind(ProfileRecord::DEFAULT_AFFILIATION)
            .bind(ProfileRecord::DEFAULT_DESCRIPTION),
            SettingsVariant::Site => sqlx::query(
                r#"
                INSERT INTO sites (name, description, lat, lon, elevation)
                VALUES ($1, $2, 0, 0, 0)
                "#,
            )
            .bind(SiteRecord::DEFAULT_NAME)
            .bind(SiteRecord::DEFAULT_DESCRIPTION),
            SettingsVariant::Instrument => sqlx::query(
                r#"
                INSERT INTO instruments (name, site_id, sample_rate_seconds, is_active)
                VALUES ($1, (SELECT id FROM sites ORDER BY id LIMIT 1), $2, true)
                "#,
            )
            .bind(InstrumentRecord::DEFAULT_NAME)
            .bind(InstrumentRecord::DEFAULT_SAMPLE_RATE_SECONDS),
        };

        query
            .execute(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        Ok(())
    }
}
