//! The `records` command: dump a form's stored records.

use async_trait::async_trait;
use dynform_core::{DynformError, DynformResult, Settings};
use dynform_store::{tabular, FileRecordStore, RecordStore};

use crate::command::ManagementCommand;

use super::required_arg;

/// Prints a form's records as a JSON array, or its CSV export with `--csv`.
pub struct RecordsCommand;

#[async_trait]
impl ManagementCommand for RecordsCommand {
    fn name(&self) -> &'static str {
        "records"
    }

    fn help(&self) -> &'static str {
        "Print a form's stored records"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(clap::Arg::new("form").required(true).help("Form name"))
            .arg(
                clap::Arg::new("csv")
                    .long("csv")
                    .action(clap::ArgAction::SetTrue)
                    .help("Print the tabular export instead"),
            )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> DynformResult<String> {
        let form = required_arg(matches, "form")?;
        let store = FileRecordStore::new(&settings.data_dir);

        if matches.get_flag("csv") {
            let rows = store.tabular_rows(form).await?;
            let bytes = tabular::encode_rows(&rows)?;
            return Ok(String::from_utf8_lossy(&bytes).trim_end().to_string());
        }

        let records = store.load(form).await?;
        serde_json::to_string_pretty(&records)
            .map_err(|e| DynformError::SerializationError(e.to_string()))
    }
}
