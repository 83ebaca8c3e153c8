//! # dynform-cli
//!
//! The `dynform` command-line tool.
//!
//! - [`command`] - the [`ManagementCommand`] trait and [`CommandRegistry`]
//! - [`commands`] - the built-in `forms`, `show`, `submit`, `records`, and
//!   `check` commands
//!
//! ```rust
//! use dynform_cli::command::CommandRegistry;
//! use dynform_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//! assert_eq!(
//!     registry.list_commands(),
//!     vec!["check", "forms", "records", "show", "submit"]
//! );
//! ```

pub mod command;
pub mod commands;

use std::path::Path;

use dynform_core::{settings_loader, DynformResult, Settings};

pub use command::{CommandRegistry, ManagementCommand};

/// Loads settings from `path` when given, otherwise from defaults. Environment
/// overrides apply either way.
pub fn load_settings(path: Option<&Path>) -> DynformResult<Settings> {
    match path {
        Some(path) => settings_loader::from_file_with_env(path),
        None => Ok(settings_loader::from_env()),
    }
}
