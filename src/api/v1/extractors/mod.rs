pub mod current;

pub use current::{CurrentArchive, CurrentContext, CurrentIdentity, CurrentSettings};
