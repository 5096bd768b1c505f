//! CLI, authentication and commands
//!
//! This crate provides the `todo` command-line interface.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod resolver;

#[cfg(test)]
mod fakes;

pub use auth::Authenticator;
pub use cli::Cli;
pub use config::{ClientConfig, Settings};
pub use error::{ClientError, ClientResult};
