pub mod archive;
pub mod identity;
pub mod settings;
