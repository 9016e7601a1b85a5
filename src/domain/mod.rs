//! Domain logic - pure version arithmetic independent of files and git

pub mod prerelease;
pub mod version;

pub use version::{increment, Increment, ReleaseType};
