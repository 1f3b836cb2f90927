/*
 * Responsibility
 * - sessions テーブル (cookie session) の参照
 * - 有効 (revoked_at IS NULL かつ未失効) な session の持ち主だけを返す
 * - token 認証は session を作らないので、ここに書き込み系は無い
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoResult;
use crate::repos::user_repo::UserRecord;

#[async_trait]
pub trait SessionStore: Send + Sync {
    // Returns the user owning an active session, `None` when the session is
    // unknown, revoked or expired at `now`.
    async fn current_user(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<UserRecord>>;
}

#[derive(Clone, Debug)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn current_user(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT u.id, u.email, u.api_key, u.roles
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
              AND s.revoked_at IS NULL
              AND s.expires_at > $2
            "#,
        )
        .bind(session_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
