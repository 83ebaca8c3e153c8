//! The `check` command: validate every form definition on disk.

use async_trait::async_trait;
use dynform_core::{DynformError, DynformResult, Settings};
use dynform_forms::FormRegistry;

use crate::command::ManagementCommand;

/// Loads every definition in the forms directory and reports the broken ones.
pub struct CheckCommand;

/// The result of checking one definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckMessage {
    pub form: String,
    pub error: String,
}

/// Loads each `.json` and `.toml` definition under `settings.forms_dir`,
/// inactive ones included, and collects the failures.
pub async fn run_checks(settings: &Settings) -> DynformResult<Vec<CheckMessage>> {
    let registry = FormRegistry::new(&settings.forms_dir);
    let mut entries = match tokio::fs::read_dir(registry.forms_dir()).await {
        Ok(entries) => entries,
        Err(e) => {
            return Err(DynformError::ImproperlyConfigured(format!(
                "Cannot read forms directory '{}': {e}",
                settings.forms_dir.display()
            )))
        }
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let ext = path.extension().and_then(|ext| ext.to_str());
        if !matches!(ext, Some("json" | "toml")) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    names.dedup();

    let mut messages = Vec::new();
    for name in names {
        if let Err(e) = registry.load(&name).await {
            messages.push(CheckMessage {
                form: name,
                error: e.to_string(),
            });
        }
    }
    Ok(messages)
}

#[async_trait]
impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Check every form definition"
    }

    async fn handle(
        &self,
        _matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> DynformResult<String> {
        let messages = run_checks(settings).await?;
        if messages.is_empty() {
            return Ok("Form check identified no issues.".to_string());
        }

        for msg in &messages {
            tracing::warn!(form = %msg.form, "{}", msg.error);
        }
        let details = messages
            .iter()
            .map(|msg| format!("  {}: {}", msg.form, msg.error))
            .collect::<Vec<_>>()
            .join("\n");
        Err(DynformError::ImproperlyConfigured(format!(
            "Form check found {} broken definition(s):\n{details}",
            messages.len()
        )))
    }
}
