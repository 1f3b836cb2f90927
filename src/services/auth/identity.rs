/*
 * Responsibility
 * - リクエストに 1 つだけ紐づく Identity (認証済みユーザー or guest) の型
 * - bootstrap が request extensions に格納し、handler / Ability はこの型だけを見る
 */
use std::collections::BTreeSet;

use serde::Serialize;
use uuid::Uuid;

use crate::repos::UserRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    DataCreator,
    DataDownloader,
    Measurements,
    RegisteredUser,
    Guest,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "data_creator" => Some(Self::DataCreator),
            "data_downloader" => Some(Self::DataDownloader),
            "measurements" => Some(Self::Measurements),
            "registered_user" => Some(Self::RegisteredUser),
            "guest" => Some(Self::Guest),
            _ => None,
        }
    }
}

/// How an authenticated identity was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// `email` + `api_key` request parameters. Never backed by a session.
    Token,
    Session,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    User {
        user: UserRecord,
        roles: BTreeSet<Role>,
        via: AuthMethod,
    },
    Guest,
}

impl Identity {
    /// Unknown role strings in the stored record are dropped.
    pub fn authenticated(user: UserRecord, via: AuthMethod) -> Self {
        let roles = user.roles.iter().filter_map(|r| Role::parse(r)).collect();
        Self::User { user, roles, via }
    }

    pub fn guest() -> Self {
        Self::Guest
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }

    pub fn roles(&self) -> BTreeSet<Role> {
        match self {
            Self::User { roles, .. } => roles.clone(),
            Self::Guest => BTreeSet::from([Role::Guest]),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        match self {
            Self::User { roles, .. } => roles.contains(&role),
            Self::Guest => role == Role::Guest,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::User { user, .. } => Some(user.id),
            Self::Guest => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Self::User { user, .. } => Some(user.email.as_str()),
            Self::Guest => None,
        }
    }

    pub fn auth_method(&self) -> Option<AuthMethod> {
        match self {
            Self::User { via, .. } => Some(*via),
            Self::Guest => None,
        }
    }
}
