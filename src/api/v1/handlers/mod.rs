pub mod archive;
pub mod health;
pub mod me;
pub mod notifications;
pub mod settings;
