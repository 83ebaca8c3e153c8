//! The command framework behind the `dynform` binary.
//!
//! Each subcommand implements [`ManagementCommand`]; a [`CommandRegistry`]
//! builds the clap parser from the registered commands and dispatches to
//! the one the user named.
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use dynform_cli::command::ManagementCommand;
//! use dynform_core::{DynformResult, Settings};
//!
//! struct WhereCommand;
//!
//! #[async_trait]
//! impl ManagementCommand for WhereCommand {
//!     fn name(&self) -> &str { "where" }
//!     fn help(&self) -> &str { "Print the data directory" }
//!
//!     async fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         settings: &Settings,
//!     ) -> DynformResult<String> {
//!         Ok(settings.data_dir.display().to_string())
//!     }
//! }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use dynform_core::{DynformError, DynformResult, Settings};

/// A subcommand of the `dynform` binary.
#[async_trait]
pub trait ManagementCommand: Send + Sync {
    /// Returns the name used to invoke this command.
    fn name(&self) -> &str;

    /// Returns a short help description.
    fn help(&self) -> &str;

    /// Adds positional arguments and flags. The default adds none.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Runs the command and returns the text to print on standard output.
    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings)
        -> DynformResult<String>;
}

/// Registered commands, by name.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn ManagementCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a command, replacing any command with the same name.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        let name = command.name().to_string();
        self.commands.insert(name, command);
    }

    /// Returns the command named `name`.
    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Returns the registered command names, sorted.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level parser, with a global `--settings <path>` option
    /// and one subcommand per registered command.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("dynform")
            .about("Declarative forms: validate submissions and store records")
            .subcommand_required(true)
            .arg(
                clap::Arg::new("settings")
                    .long("settings")
                    .global(true)
                    .value_name("PATH")
                    .help("TOML or JSON settings file"),
            );

        let mut entries: Vec<_> = self.commands.iter().collect();
        entries.sort_by_key(|(name, _)| (*name).clone());

        for (name, cmd) in entries {
            // clap wants 'static names; commands are registered once at startup.
            let static_name: &'static str = Box::leak(name.clone().into_boxed_str());
            let subcmd = clap::Command::new(static_name).about(cmd.help().to_string());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }

        app
    }

    /// Dispatches to the subcommand selected in `matches`.
    pub async fn execute(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> DynformResult<String> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            DynformError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self.get(name).ok_or_else(|| {
            DynformError::ConfigurationError(format!("Unknown command: {name}"))
        })?;

        tracing::debug!(command = name, "running command");
        cmd.handle(sub_matches, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoCommand;

    #[async_trait]
    impl ManagementCommand for EchoCommand {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn help(&self) -> &'static str {
            "Echo a word"
        }

        fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
            cmd.arg(clap::Arg::new("word").required(true))
        }

        async fn handle(
            &self,
            matches: &clap::ArgMatches,
            _settings: &Settings,
        ) -> DynformResult<String> {
            Ok(matches
                .get_one::<String>("word")
                .cloned()
                .unwrap_or_default())
        }
    }

    #[test]
    fn test_register_and_list() {
        let mut registry = CommandRegistry::new();
        assert!(registry.is_empty());
        registry.register(Box::new(EchoCommand));
        registry.register(Box::new(EchoCommand));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list_commands(), vec!["echo"]);
        assert!(registry.get("missing").is_none());
    }

    #[tokio::test]
    async fn test_execute_dispatches() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand));
        let matches = registry
            .build_cli()
            .try_get_matches_from(["dynform", "echo", "hola"])
            .unwrap();
        let out = registry
            .execute(&matches, &Settings::default())
            .await
            .unwrap();
        assert_eq!(out, "hola");
    }

    #[test]
    fn test_settings_option_is_global() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand));
        let matches = registry
            .build_cli()
            .try_get_matches_from(["dynform", "echo", "x", "--settings", "app.toml"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("settings").map(String::as_str),
            Some("app.toml")
        );
    }

    #[test]
    fn test_subcommand_required() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand));
        assert!(registry.build_cli().try_get_matches_from(["dynform"]).is_err());
    }
}
