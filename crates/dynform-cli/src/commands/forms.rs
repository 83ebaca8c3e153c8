//! The `forms` command: list the active forms.

use async_trait::async_trait;
use dynform_core::{DynformResult, Settings};
use dynform_forms::{FormRegistry, FormSummary};

use crate::command::ManagementCommand;

/// Lists every active form with its title and description.
pub struct FormsCommand;

/// Renders one line per form: `name  title` plus ` - description` if set.
pub fn render_form_list(forms: &[FormSummary]) -> String {
    if forms.is_empty() {
        return "No active forms.".to_string();
    }
    let width = forms.iter().map(|form| form.name.len()).max().unwrap_or(0);
    forms
        .iter()
        .map(|form| {
            let mut line = format!("{:<width$}  {}", form.name, form.title);
            if !form.description.is_empty() {
                line.push_str(" - ");
                line.push_str(&form.description);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl ManagementCommand for FormsCommand {
    fn name(&self) -> &'static str {
        "forms"
    }

    fn help(&self) -> &'static str {
        "List active forms"
    }

    async fn handle(
        &self,
        _matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> DynformResult<String> {
        let registry = FormRegistry::new(&settings.forms_dir);
        let forms = registry.list_active().await?;
        tracing::debug!(count = forms.len(), "listed active forms");
        Ok(render_form_list(&forms))
    }
}
