//! Lifecycle scripts for extensibility
//!
//! Users can run shell commands around every release step, configured under
//! `[scripts]`:
//! - prerelease: Before anything else; a failure aborts the release
//! - prebump / postbump: Around version resolution and file updates. A
//!   `prebump` script printing a version overrides `release_as`
//! - prechangelog / postchangelog: Around the changelog update
//! - precommit / postcommit: Around the release commit
//! - pretag / posttag: Around tag creation

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};
