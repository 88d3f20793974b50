//! Hoshikuzu development server.
//!
//! Serves a project directory with live reload and runs [`DevPlugin`] hooks on
//! server start and file changes. The bundled devtools plugin reports both to
//! an external listener when `--notify-url` is set.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - command implementations
//! - [`config`] - layered configuration (file, env, flags)
//! - [`dev`] - server, watcher, plugin container
//! - [`error`] - error types and miette conversion
//! - [`logger`] - tracing setup
//! - [`ui`] - terminal status lines
//!
//! [`DevPlugin`]: hoshikuzu_plugin::DevPlugin

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result};
