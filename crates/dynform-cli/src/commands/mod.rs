//! Built-in `dynform` commands.
//!
//! Each command implements [`ManagementCommand`](crate::command::ManagementCommand)
//! and reads its form definitions and records from the directories named in
//! [`Settings`](dynform_core::Settings).

pub mod check;
pub mod forms;
pub mod records;
pub mod show;
pub mod submit;

pub use check::CheckCommand;
pub use forms::FormsCommand;
pub use records::RecordsCommand;
pub use show::ShowCommand;
pub use submit::SubmitCommand;

use dynform_core::{DynformError, DynformResult};

use crate::command::CommandRegistry;

/// Registers every built-in command into `registry`.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(FormsCommand));
    registry.register(Box::new(ShowCommand));
    registry.register(Box::new(SubmitCommand));
    registry.register(Box::new(RecordsCommand));
    registry.register(Box::new(CheckCommand));
}

fn required_arg<'a>(matches: &'a clap::ArgMatches, name: &str) -> DynformResult<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| DynformError::BadRequest(format!("missing argument <{name}>")))
}
