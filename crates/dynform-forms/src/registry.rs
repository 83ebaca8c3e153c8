//! Loading form schemas from a definitions directory.
//!
//! Each form is one file in the directory, `{name}.json` or `{name}.toml`.
//! The file stem is the form's name.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dynform_core::{DynformError, DynformResult};
use dynform_store::check_form_name;

use crate::schema::FormSchema;

/// The listing entry for one active form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSummary {
    /// The form name, taken from the definition file stem.
    pub name: String,
    /// The title shown to users.
    pub title: String,
    /// The description, empty when the definition has none.
    pub description: String,
}

impl From<&FormSchema> for FormSummary {
    fn from(schema: &FormSchema) -> Self {
        Self {
            name: schema.name.clone(),
            title: schema.title.clone(),
            description: schema.description.clone(),
        }
    }
}

/// A directory of form definition files.
///
/// Definitions are read on every call, so edits on disk take effect without
/// a restart.
#[derive(Debug, Clone)]
pub struct FormRegistry {
    forms_dir: PathBuf,
}

impl FormRegistry {
    /// Creates a registry over `forms_dir`.
    pub fn new(forms_dir: impl Into<PathBuf>) -> Self {
        Self {
            forms_dir: forms_dir.into(),
        }
    }

    /// Returns the definitions directory.
    pub fn forms_dir(&self) -> &Path {
        &self.forms_dir
    }

    /// Loads and checks the schema for `name`, active or not.
    ///
    /// A JSON definition wins over a TOML one with the same stem. Returns
    /// [`DynformError::NotFound`] when neither exists.
    pub async fn load(&self, name: &str) -> DynformResult<FormSchema> {
        check_form_name(name)?;

        let json_path = self.forms_dir.join(format!("{name}.json"));
        if let Some(contents) = read_optional(&json_path).await? {
            return FormSchema::from_json_str(name, &contents);
        }

        let toml_path = self.forms_dir.join(format!("{name}.toml"));
        if let Some(contents) = read_optional(&toml_path).await? {
            return FormSchema::from_toml_str(name, &contents);
        }

        Err(DynformError::NotFound(format!("Form '{name}' does not exist")))
    }

    /// Loads the schema for `name`, refusing inactive forms with
    /// [`DynformError::PermissionDenied`].
    pub async fn load_active(&self, name: &str) -> DynformResult<FormSchema> {
        let schema = self.load(name).await?;
        if !schema.active {
            return Err(DynformError::PermissionDenied(format!(
                "Form '{name}' is not active"
            )));
        }
        Ok(schema)
    }

    /// Lists every active form, sorted by name.
    ///
    /// Definitions that fail to load are skipped with a warning. A missing
    /// directory lists nothing.
    pub async fn list_active(&self) -> DynformResult<Vec<FormSummary>> {
        let mut entries = match tokio::fs::read_dir(&self.forms_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_definition = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("json" | "toml")
            );
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if is_definition && !names.iter().any(|name| name == stem) {
                names.push(stem.to_string());
            }
        }
        names.sort();

        let mut summaries = Vec::new();
        for name in names {
            match self.load(&name).await {
                Ok(schema) if schema.active => summaries.push(FormSummary::from(&schema)),
                Ok(_) => {}
                Err(e) => tracing::warn!(form = %name, error = %e, "skipping form definition"),
            }
        }
        Ok(summaries)
    }

    /// Writes `schema` as `{name}.json`, creating the directory if needed.
    pub async fn save(&self, schema: &FormSchema) -> DynformResult<()> {
        check_form_name(&schema.name)?;
        schema.check()?;

        let json = serde_json::to_string_pretty(schema)
            .map_err(|e| DynformError::SerializationError(e.to_string()))?;
        tokio::fs::create_dir_all(&self.forms_dir).await?;
        let path = self.forms_dir.join(format!("{}.json", schema.name));
        tokio::fs::write(&path, json).await?;
        tracing::debug!(form = %schema.name, path = %path.display(), "form definition saved");
        Ok(())
    }
}

async fn read_optional(path: &Path) -> DynformResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
