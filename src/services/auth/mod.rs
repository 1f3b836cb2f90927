pub mod ability;
pub mod credential;
pub mod identity;
pub mod resolver;

pub use ability::{Ability, Action, Resource};
pub use credential::{CredentialComparator, SecureComparator};
pub use identity::{AuthMethod, Identity, Role};
pub use resolver::{CredentialParams, IdentityResolver};
