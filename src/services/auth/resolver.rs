/*
 * Responsibility
 * - リクエストの Identity を決定する (first match wins)
 *   1. token: params.email + params.api_key (session は作らない)
 *   2. session: cookie の session id
 *   3. guest
 * - 認証失敗 (email 不明 / api_key 不一致) はエラーではなく次の段へ落ちる
 * - ストレージ障害だけは RepoError として呼び出し側へ返す
 */
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repos::{RepoResult, SessionStore, UserStore};
use crate::services::auth::credential::CredentialComparator;
use crate::services::auth::identity::{AuthMethod, Identity};

/// Token credentials taken from the request query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialParams {
    pub email: Option<String>,
    pub api_key: Option<String>,
}

impl CredentialParams {
    /// Reads `email` / `api_key` from a raw query string. Later duplicates win.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "email" => params.email = Some(value.into_owned()),
                "api_key" => params.api_key = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    /// `email` counts as present only when it is not blank.
    fn present_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }
}

#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    comparator: Arc<dyn CredentialComparator>,
}

impl IdentityResolver {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        comparator: Arc<dyn CredentialComparator>,
    ) -> Self {
        Self {
            users,
            sessions,
            comparator,
        }
    }

    /// Always yields an identity; guest when nothing else resolves.
    pub async fn resolve(
        &self,
        params: &CredentialParams,
        session_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> RepoResult<Identity> {
        if let Some(identity) = self.authenticate_from_token(params).await? {
            return Ok(identity);
        }

        if let Some(identity) = self.authenticate_from_session(session_id, now).await? {
            return Ok(identity);
        }

        Ok(Identity::guest())
    }

    async fn authenticate_from_token(
        &self,
        params: &CredentialParams,
    ) -> RepoResult<Option<Identity>> {
        let Some(email) = params.present_email() else {
            return Ok(None);
        };

        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!("token authentication skipped: unknown email");
            return Ok(None);
        };

        if self
            .comparator
            .matches(user.api_key.as_deref(), params.api_key.as_deref())
        {
            tracing::debug!(user_id = %user.id, "authenticated from api key");
            Ok(Some(Identity::authenticated(user, AuthMethod::Token)))
        } else {
            tracing::debug!(user_id = %user.id, "api key mismatch");
            Ok(None)
        }
    }

    async fn authenticate_from_session(
        &self,
        session_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Identity>> {
        let Some(session_id) = session_id else {
            return Ok(None);
        };

        let user = self.sessions.current_user(session_id, now).await?;
        Ok(user.map(|user| Identity::authenticated(user, AuthMethod::Session)))
    }
}
