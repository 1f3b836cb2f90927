/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - settings store / seeder / identity resolver / mailer / archive config の場所など
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppEnv;
use crate::repos::{SessionStore, SettingsStore, UserStore};
use crate::services::archive::ArchiveConfigSource;
use crate::services::auth::{IdentityResolver, SecureComparator};
use crate::services::mail::{MailDefaults, Mailer};
use crate::services::settings::SingletonSeeder;

/// Storage collaborators, PostgreSQL-backed in production.
#[derive(Clone)]
pub struct Stores {
    pub settings: Arc<dyn SettingsStore>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<dyn SettingsStore>,
    pub seeder: SingletonSeeder,
    pub resolver: IdentityResolver,
    pub mailer: Arc<dyn Mailer>,
    pub mail_defaults: MailDefaults,
    pub archive: ArchiveConfigSource,
    pub session_cookie: Arc<str>,
    pub app_env: AppEnv,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        stores: Stores,
        mailer: Arc<dyn Mailer>,
        archive: ArchiveConfigSource,
        session_cookie: &str,
        app_env: AppEnv,
    ) -> Self {
        let seeder = SingletonSeeder::new(stores.settings.clone());
        let resolver =
            IdentityResolver::new(stores.users, stores.sessions, Arc::new(SecureComparator));

        Self {
            settings: stores.settings,
            seeder,
            resolver,
            mailer,
            mail_defaults: MailDefaults::default(),
            archive,
            session_cookie: Arc::from(session_cookie),
            app_env,
            started_at: Instant::now(),
        }
    }
}
