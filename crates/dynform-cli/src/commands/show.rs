//! The `show` command: describe one form's fields.

use async_trait::async_trait;
use dynform_core::{DynformResult, Settings};
use dynform_forms::{FieldDef, FormRegistry, FormSchema};

use crate::command::ManagementCommand;

use super::required_arg;

/// Prints an active form's title, description, and fields.
pub struct ShowCommand;

/// Renders a schema as a heading followed by one line per field.
pub fn render_schema(schema: &FormSchema) -> String {
    let mut out = schema.title.clone();
    if !schema.description.is_empty() {
        out.push('\n');
        out.push_str(&schema.description);
    }
    for field in &schema.fields {
        out.push_str("\n  ");
        out.push_str(&describe_field(field));
    }
    if let Some(key) = &schema.unique_key {
        out.push_str(&format!("\nunique: {key}"));
    }
    out
}

fn describe_field(field: &FieldDef) -> String {
    let mut line = format!("{} ({})", field.display_label(), field.field_type);
    if field.label.is_some() {
        line.push_str(&format!(" [{}]", field.name));
    }
    if field.required {
        line.push_str(" *");
    }
    if !field.options.is_empty() {
        line.push_str(&format!(": {}", field.options.join(", ")));
    }
    line
}

#[async_trait]
impl ManagementCommand for ShowCommand {
    fn name(&self) -> &'static str {
        "show"
    }

    fn help(&self) -> &'static str {
        "Show an active form's fields"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("form")
                .required(true)
                .help("Form name (the definition file stem)"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> DynformResult<String> {
        let form = required_arg(matches, "form")?;
        let schema = FormRegistry::new(&settings.forms_dir).load_active(form).await?;
        Ok(render_schema(&schema))
    }
}
