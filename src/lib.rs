pub mod boundary;
pub mod bump;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod git;
pub mod hooks;
pub mod resolve;
pub mod ui;
pub mod updaters;

pub use error::{BumpError, Result};
