//! The `submit` command: validate and store one submission.

use std::fmt::Write as _;

use async_trait::async_trait;
use dynform_core::{DynformError, DynformResult, Settings};
use dynform_forms::{FormRegistry, RawSubmission, Rejection, SubmissionEngine, SubmitOutcome};
use dynform_store::FileRecordStore;

use crate::command::ManagementCommand;

use super::required_arg;

/// Submits urlencoded form data to an active form.
///
/// A rejected submission prints its errors and fails with
/// [`DynformError::BadRequest`], so the process exits non-zero.
pub struct SubmitCommand;

/// Renders a rejection, general errors first, then one line per field.
pub fn render_rejection(rejection: &Rejection) -> String {
    let mut out = String::from("Submission rejected:");
    for error in &rejection.general_errors {
        let _ = write!(out, "\n  {error}");
    }
    for (field, error) in &rejection.field_errors {
        let _ = write!(out, "\n  {field}: {error}");
    }
    out
}

#[async_trait]
impl ManagementCommand for SubmitCommand {
    fn name(&self) -> &'static str {
        "submit"
    }

    fn help(&self) -> &'static str {
        "Submit urlencoded data to a form"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(clap::Arg::new("form").required(true).help("Form name"))
            .arg(
                clap::Arg::new("data")
                    .required(true)
                    .help("Form data, e.g. 'name=Ana&topics=rust&topics=web'"),
            )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> DynformResult<String> {
        let form = required_arg(matches, "form")?;
        let raw = RawSubmission::parse(required_arg(matches, "data")?);

        let schema = FormRegistry::new(&settings.forms_dir).load_active(form).await?;
        let engine = SubmissionEngine::new(FileRecordStore::new(&settings.data_dir));

        match engine.submit(&schema, &raw).await? {
            SubmitOutcome::Accepted => Ok(format!("Record stored for form '{form}'.")),
            SubmitOutcome::Rejected(rejection) => {
                Err(DynformError::BadRequest(render_rejection(&rejection)))
            }
        }
    }
}
