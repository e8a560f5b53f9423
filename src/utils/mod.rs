//! Utility helpers: artifact file IO.
pub mod files;

pub use files::read_or_empty;
pub use files::write_artifact;
