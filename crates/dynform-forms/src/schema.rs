//! Form schemas.
//!
//! A [`FormSchema`] is the in-memory form of one definition document: a
//! title, an active flag, an ordered list of [`FieldDef`]s, and an optional
//! unique key. The schema's name is its storage identity (the definition
//! file's stem) and is never read from the document itself.

use dynform_core::{DynformError, DynformResult};
use serde::{Deserialize, Serialize};

use crate::fields::FieldDef;

const fn default_active() -> bool {
    true
}

/// A declarative form definition.
///
/// # Examples
///
/// ```
/// use dynform_forms::schema::FormSchema;
///
/// let schema = FormSchema::from_json_str(
///     "newsletter",
///     r#"{
///         "title": "Newsletter",
///         "unique_key": "email",
///         "fields": [{"name": "email", "type": "email", "required": true}]
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(schema.name, "newsletter");
/// assert!(schema.active);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    /// The storage identity. Set by the loader, not serialized.
    #[serde(skip)]
    pub name: String,
    /// The form title. Defaults to the name when empty.
    #[serde(alias = "titulo", default)]
    pub title: String,
    /// Optional description shown above the form.
    #[serde(alias = "descripcion", default)]
    pub description: String,
    /// Inactive forms accept neither display nor submissions.
    #[serde(alias = "activo", default = "default_active")]
    pub active: bool,
    /// The fields, in display and storage order.
    #[serde(alias = "campos", default)]
    pub fields: Vec<FieldDef>,
    /// A field whose submitted value must not repeat across records.
    #[serde(
        alias = "identificador_unico",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub unique_key: Option<String>,
}

impl FormSchema {
    /// Creates an active schema with no fields.
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: String::new(),
            active: true,
            fields: Vec::new(),
            unique_key: None,
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the unique key.
    #[must_use]
    pub fn unique_key(mut self, key: impl Into<String>) -> Self {
        self.unique_key = Some(key.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Parses a JSON definition document and checks its invariants.
    pub fn from_json_str(name: &str, json: &str) -> DynformResult<Self> {
        let schema: Self = serde_json::from_str(json).map_err(|e| {
            DynformError::ImproperlyConfigured(format!("Invalid definition for form '{name}': {e}"))
        })?;
        schema.named(name)
    }

    /// Parses a TOML definition document and checks its invariants.
    pub fn from_toml_str(name: &str, toml_str: &str) -> DynformResult<Self> {
        let schema: Self = toml::from_str(toml_str).map_err(|e| {
            DynformError::ImproperlyConfigured(format!("Invalid definition for form '{name}': {e}"))
        })?;
        schema.named(name)
    }

    fn named(mut self, name: &str) -> DynformResult<Self> {
        self.name = name.to_string();
        if self.title.is_empty() {
            self.title = self.name.clone();
        }
        self.check()?;
        Ok(self)
    }

    /// Returns the field named `name`.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Checks the schema invariants:
    ///
    /// - field names are non-empty and unique;
    /// - required select, radio, and checkbox fields have options;
    /// - the unique key, if any, names a declared field.
    pub fn check(&self) -> DynformResult<()> {
        for (index, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(self.invalid(format!("field #{} has no name", index + 1)));
            }
            if self.fields[..index].iter().any(|other| other.name == field.name) {
                return Err(self.invalid(format!("field '{}' is declared twice", field.name)));
            }
            if field.required && field.field_type.uses_options() && field.options.is_empty() {
                return Err(self.invalid(format!(
                    "required {} field '{}' has no options",
                    field.field_type, field.name
                )));
            }
        }

        if let Some(key) = &self.unique_key {
            if self.get_field(key).is_none() {
                return Err(self.invalid(format!("unique key '{key}' is not a declared field")));
            }
        }
        Ok(())
    }

    fn invalid(&self, detail: String) -> DynformError {
        DynformError::ImproperlyConfigured(format!("Form '{}': {detail}", self.name))
    }
}
