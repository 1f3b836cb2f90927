/*
 * Responsibility
 * - Identity の role から「何ができるか」を決める (coarse-grained policy)
 * - 拒否は AppError::AccessDenied として返し、応答形式への変換は middleware::rescue に任せる
 */
use crate::error::AppError;
use crate::services::auth::identity::{Identity, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Manage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Profile,
    Site,
    Instrument,
    ArchiveConfig,
    Notification,
}

pub struct Ability<'a> {
    identity: &'a Identity,
    secure_administration: bool,
}

impl<'a> Ability<'a> {
    pub fn new(identity: &'a Identity, secure_administration: bool) -> Self {
        Self {
            identity,
            secure_administration,
        }
    }

    pub fn can(&self, action: Action, resource: Resource) -> bool {
        if self.identity.has_role(Role::Admin) {
            return true;
        }

        match (action, resource) {
            (Action::Read, Resource::Profile | Resource::Site | Resource::Instrument) => true,
            (Action::Read, Resource::ArchiveConfig | Resource::Notification) => false,
            // With secure administration on, every edit needs an administrator.
            // Request bootstrap always turns it on, so the two arms below only
            // apply to callers evaluating a stored profile as-is.
            (Action::Manage, _) if self.secure_administration => false,
            (Action::Manage, Resource::Instrument) => self.identity.has_role(Role::DataCreator),
            (Action::Manage, _) => !self.identity.is_guest(),
        }
    }

    pub fn authorize(&self, action: Action, resource: Resource) -> Result<(), AppError> {
        if self.can(action, resource) {
            return Ok(());
        }

        tracing::info!(
            user_id = ?self.identity.user_id(),
            ?action,
            ?resource,
            "access denied"
        );
        Err(AppError::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::repos::UserRecord;
    use crate::services::auth::identity::AuthMethod;

    fn with_roles(roles: &[&str]) -> Identity {
        Identity::authenticated(
            UserRecord {
                id: Uuid::new_v4(),
                email: "someone@example.org".into(),
                api_key: None,
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
            AuthMethod::Session,
        )
    }

    #[test]
    fn guests_read_public_settings_only() {
        let guest = Identity::guest();
        let ability = Ability::new(&guest, true);
        assert!(ability.can(Action::Read, Resource::Profile));
        assert!(ability.can(Action::Read, Resource::Instrument));
        assert!(!ability.can(Action::Read, Resource::ArchiveConfig));
        assert!(!ability.can(Action::Manage, Resource::Site));
        assert!(matches!(
            ability.authorize(Action::Manage, Resource::Profile),
            Err(AppError::AccessDenied)
        ));
    }

    #[test]
    fn secure_administration_reserves_edits_for_admins() {
        let creator = with_roles(&["data_creator"]);
        assert!(!Ability::new(&creator, true).can(Action::Manage, Resource::Instrument));
        assert!(Ability::new(&creator, false).can(Action::Manage, Resource::Instrument));

        let admin = with_roles(&["admin"]);
        assert!(Ability::new(&admin, true).can(Action::Manage, Resource::Notification));
        assert!(Ability::new(&admin, true).authorize(Action::Read, Resource::ArchiveConfig).is_ok());
    }

    #[test]
    fn stored_flag_off_still_opens_edits_to_signed_in_users() {
        let measurements = with_roles(&["measurements"]);
        assert!(Ability::new(&measurements, false).can(Action::Manage, Resource::Notification));
        assert!(!Ability::new(&measurements, false).can(Action::Manage, Resource::Instrument));
        assert!(!Ability::new(&measurements, true).can(Action::Manage, Resource::Notification));
    }
}
