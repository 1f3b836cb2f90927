/*
 * Responsibility
 * - 永続化層の公開インターフェース
 * - 各 store trait と PostgreSQL 実装を束ねる
 */
pub mod error;
pub mod session_repo;
pub mod settings_repo;
pub mod user_repo;

pub use error::{RepoError, RepoResult};
pub use session_repo::{PgSessionStore, SessionStore};
pub use settings_repo::{
    InstrumentRecord, PgSettingsStore, ProfileRecord, SettingsRecord, SettingsStore,
    SettingsVariant, SiteRecord,
};
pub use user_repo::{PgUserStore, UserRecord, UserStore};
