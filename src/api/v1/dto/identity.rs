use serde::Serialize;
use uuid::Uuid;

use crate::services::auth::{AuthMethod, Identity, Role};

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub guest: bool,
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub roles: Vec<Role>,
    pub authenticated_via: Option<AuthMethod>,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            guest: identity.is_guest(),
            user_id: identity.user_id(),
            email: identity.email().map(String::from),
            roles: identity.roles().into_iter().collect(),
            authenticated_via: identity.auth_method(),
        }
    }
}
