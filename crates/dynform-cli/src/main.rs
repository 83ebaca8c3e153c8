use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use dynform_cli::commands::register_builtin_commands;
use dynform_cli::{load_settings, CommandRegistry};
use dynform_core::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<String> {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    let settings_path = matches.get_one::<String>("settings").map(PathBuf::from);
    let settings = load_settings(settings_path.as_deref()).with_context(|| {
        settings_path.as_ref().map_or_else(
            || "loading default settings".to_string(),
            |path| format!("loading settings from {}", path.display()),
        )
    })?;
    setup_logging(&settings);

    let output = registry.execute(&matches, &settings).await?;
    Ok(output)
}
