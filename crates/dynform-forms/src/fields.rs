//! Field definitions and type-level validation.
//!
//! Each [`FieldDef`] describes one input of a form: its [`FieldType`], whether
//! it is required, the allowed options, and numeric constraints.
//! [`validate_value`] decides whether a submitted value is acceptable for a
//! field, dispatching on the field type with one rule per variant.
//!
//! Definition documents may use the English keys or the Spanish keys of
//! older definition files (`nombre`, `tipo`, `obligatorio`, `opciones`,
//! `longitud`, `etiqueta`).

use std::fmt;

use dynform_core::FieldValue;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum number of characters accepted by a `textarea` field.
pub const TEXTAREA_MAX_CHARS: usize = 500;

static TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\sáéíóúÁÉÍÓÚñÑ.,-]*$").expect("valid regex"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("valid regex"));

/// The type of a form field. Drives which validation rule applies.
///
/// Type names not in the fixed set parse as [`FieldType::Unknown`], which
/// accepts any value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Free text: letters, digits, whitespace, accented vowels, `.`, `,`, `-`.
    Text,
    /// An email address.
    Email,
    /// A non-negative whole number written with ASCII digits.
    Number,
    /// One value chosen from the options.
    Select,
    /// Zero or more values chosen from the options.
    Checkbox,
    /// One value chosen from the options.
    Radio,
    /// Long free text, at most [`TEXTAREA_MAX_CHARS`] characters.
    Textarea,
    /// Any other type name. A missing type is `Unknown("")`.
    Unknown(String),
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl FieldType {
    /// Returns the configuration name of this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Textarea => "textarea",
            Self::Unknown(name) => name,
        }
    }

    /// Returns `true` for types whose submitted value is a sequence.
    pub const fn is_multi_valued(&self) -> bool {
        matches!(self, Self::Checkbox)
    }

    /// Returns `true` for types validated against a list of options.
    pub const fn uses_options(&self) -> bool {
        matches!(self, Self::Select | Self::Checkbox | Self::Radio)
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "text" => Self::Text,
            "email" => Self::Email,
            "number" => Self::Number,
            "select" => Self::Select,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "textarea" => Self::Textarea,
            _ => Self::Unknown(name),
        }
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn default_multiple() -> bool {
    true
}

/// Complete definition of one form field.
///
/// # Examples
///
/// ```
/// use dynform_forms::fields::{validate_value, FieldDef, FieldType};
///
/// let zip = FieldDef::new("zip", FieldType::Number).required(true).length(5);
/// assert!(validate_value(&"12345".into(), &zip));
/// assert!(!validate_value(&"1234".into(), &zip));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// The field name, used as the record key.
    #[serde(alias = "nombre")]
    pub name: String,
    /// The field type.
    #[serde(rename = "type", alias = "tipo", default)]
    pub field_type: FieldType,
    /// Whether an empty value is rejected.
    #[serde(alias = "obligatorio", default)]
    pub required: bool,
    /// Allowed values for select, checkbox, and radio fields.
    #[serde(alias = "opciones", default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Whether a checkbox group accepts more than one selection.
    #[serde(default = "default_multiple")]
    pub multiple: bool,
    /// Exact digit count for number fields. Zero means unset.
    #[serde(alias = "longitud", default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Inclusive lower bound for number fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    /// Inclusive upper bound for number fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    /// Human-readable label for renderers.
    #[serde(alias = "etiqueta", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FieldDef {
    /// Creates an optional field of the given type with no constraints.
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            required: false,
            options: Vec::new(),
            multiple: true,
            length: None,
            min: None,
            max: None,
            label: None,
        }
    }

    /// Sets whether this field is required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the allowed options.
    #[must_use]
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether a checkbox group accepts several selections.
    #[must_use]
    pub const fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Sets the exact digit count for a number field.
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the inclusive lower bound for a number field.
    #[must_use]
    pub const fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the inclusive upper bound for a number field.
    #[must_use]
    pub const fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Sets the display label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the label, falling back to the field name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    fn allows(&self, value: &str) -> bool {
        self.options.iter().any(|option| option == value)
    }
}

/// Decides whether `value` is acceptable for `field`.
///
/// Empty values pass unless the field is required. Non-empty values must
/// satisfy the rule of the field's type; unknown types accept anything.
/// Sequences submitted to single-valued types are rejected unless empty.
pub fn validate_value(value: &FieldValue, field: &FieldDef) -> bool {
    if matches!(field.field_type, FieldType::Unknown(_)) {
        return true;
    }
    if value.is_empty() {
        return !field.required;
    }

    if field.field_type.is_multi_valued() {
        return validate_checkbox(&value.as_list(), field);
    }

    let Some(text) = value.as_scalar() else {
        return false;
    };
    match &field.field_type {
        FieldType::Text => TEXT_RE.is_match(text),
        FieldType::Email => EMAIL_RE.is_match(text),
        FieldType::Number => validate_number(text, field),
        FieldType::Select | FieldType::Radio => field.allows(text),
        FieldType::Textarea => text.chars().count() <= TEXTAREA_MAX_CHARS,
        FieldType::Checkbox | FieldType::Unknown(_) => true,
    }
}

fn validate_number(text: &str, field: &FieldDef) -> bool {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if let Some(length) = field.length.filter(|&n| n > 0) {
        if text.len() != length {
            return false;
        }
    }

    // Too many digits for u128 is larger than any i64 bound.
    let number = text
        .parse::<u128>()
        .map_or(i128::MAX, |n| i128::try_from(n).unwrap_or(i128::MAX));
    if field.min.is_some_and(|min| number < i128::from(min)) {
        return false;
    }
    if field.max.is_some_and(|max| number > i128::from(max)) {
        return false;
    }
    true
}

fn validate_checkbox(selected: &[&str], field: &FieldDef) -> bool {
    if !field.multiple && selected.len() > 1 {
        return false;
    }
    selected.iter().all(|value| field.allows(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(s: &str) -> FieldValue {
        FieldValue::from(s)
    }

    #[test]
    fn test_field_type_parsing() {
        assert_eq!(FieldType::from("email"), FieldType::Email);
        assert_eq!(FieldType::from("checkbox"), FieldType::Checkbox);
        assert_eq!(FieldType::from("date"), FieldType::Unknown("date".into()));
        assert_eq!(FieldType::from(""), FieldType::Unknown(String::new()));
        assert_eq!(FieldType::from("date").to_string(), "date");
    }

    #[test]
    fn test_empty_optional_passes_for_every_type() {
        for ty in ["text", "email", "number", "select", "checkbox", "radio", "textarea"] {
            let field = FieldDef::new("f", ty).options(["a"]);
            assert!(validate_value(&scalar(""), &field), "{ty}");
            assert!(validate_value(&FieldValue::Multi(vec![]), &field), "{ty}");
        }
    }

    #[test]
    fn test_empty_required_fails_for_every_known_type() {
        for ty in ["text", "email", "number", "select", "checkbox", "radio", "textarea"] {
            let field = FieldDef::new("f", ty).required(true).options(["a"]);
            assert!(!validate_value(&scalar(""), &field), "{ty}");
            assert!(!validate_value(&FieldValue::from(vec![""]), &field), "{ty}");
        }
    }

    #[test]
    fn test_unknown_type_always_passes() {
        let field = FieldDef::new("when", "date").required(true);
        assert!(validate_value(&scalar(""), &field));
        assert!(validate_value(&scalar("<script>"), &field));

        let untyped = FieldDef::new("anything", FieldType::default());
        assert!(validate_value(&FieldValue::from(vec!["x", "y"]), &untyped));
    }

    #[test]
    fn test_text_pattern() {
        let field = FieldDef::new("name", FieldType::Text);
        assert!(validate_value(&scalar("José Núñez-Pérez, Jr."), &field));
        assert!(validate_value(&scalar("user_42"), &field));
        assert!(!validate_value(&scalar("<b>bold</b>"), &field));
        assert!(!validate_value(&scalar("semi;colon"), &field));
    }

    #[test]
    fn test_email_shape() {
        let field = FieldDef::new("email", FieldType::Email);
        assert!(validate_value(&scalar("a@b.com"), &field));
        assert!(validate_value(&scalar("first.last-1@mail.example.org"), &field));
        assert!(!validate_value(&scalar("x"), &field));
        assert!(!validate_value(&scalar("a@b"), &field));
        assert!(!validate_value(&scalar("a b@c.com"), &field));
    }

    #[test]
    fn test_number_length() {
        let field = FieldDef::new("zip", FieldType::Number).length(5);
        assert!(validate_value(&scalar("12345"), &field));
        assert!(!validate_value(&scalar("1234"), &field));
        assert!(!validate_value(&scalar("123456"), &field));
    }

    #[test]
    fn test_number_zero_length_is_unset() {
        let field = FieldDef::new("n", FieldType::Number).length(0);
        assert!(validate_value(&scalar("123"), &field));
    }

    #[test]
    fn test_number_range_is_inclusive() {
        let field = FieldDef::new("pct", FieldType::Number).min(0).max(100);
        assert!(validate_value(&scalar("0"), &field));
        assert!(validate_value(&scalar("100"), &field));
        assert!(!validate_value(&scalar("150"), &field));

        let adult = FieldDef::new("age", FieldType::Number).min(18);
        assert!(!validate_value(&scalar("17"), &adult));
        assert!(validate_value(&scalar("18"), &adult));
    }

    #[test]
    fn test_number_rejects_non_digits() {
        let field = FieldDef::new("n", FieldType::Number);
        for bad in ["-5", "1.5", "12a", " 12", "١٢"] {
            assert!(!validate_value(&scalar(bad), &field), "{bad}");
        }
    }

    #[test]
    fn test_number_huge_value_exceeds_max() {
        let field = FieldDef::new("n", FieldType::Number).max(i64::MAX);
        let huge = "9".repeat(60);
        assert!(!validate_value(&scalar(&huge), &field));
        let unbounded = FieldDef::new("n", FieldType::Number);
        assert!(validate_value(&scalar(&huge), &unbounded));
    }

    #[test]
    fn test_select_and_radio_membership() {
        for ty in ["select", "radio"] {
            let field = FieldDef::new("size", ty).options(["S", "M", "L"]);
            assert!(validate_value(&scalar("M"), &field));
            assert!(!validate_value(&scalar("XL"), &field));
            assert!(!validate_value(&FieldValue::from(vec!["S", "M"]), &field));
        }
    }

    #[test]
    fn test_checkbox_single_selection() {
        let field = FieldDef::new("plan", FieldType::Checkbox)
            .options(["basic", "pro"])
            .multiple(false);
        assert!(validate_value(&FieldValue::from(vec!["pro"]), &field));
        assert!(!validate_value(&FieldValue::from(vec!["basic", "pro"]), &field));
    }

    #[test]
    fn test_checkbox_multiple_and_membership() {
        let field = FieldDef::new("topics", FieldType::Checkbox).options(["rust", "go", "c"]);
        assert!(validate_value(&FieldValue::from(vec!["rust", "c"]), &field));
        assert!(!validate_value(&FieldValue::from(vec!["rust", "java"]), &field));
        // A scalar is coerced into a one-element sequence.
        assert!(validate_value(&scalar("go"), &field));
    }

    #[test]
    fn test_textarea_limit() {
        let field = FieldDef::new("bio", FieldType::Textarea);
        assert!(validate_value(&scalar(&"ñ".repeat(TEXTAREA_MAX_CHARS)), &field));
        assert!(!validate_value(
            &scalar(&"a".repeat(TEXTAREA_MAX_CHARS + 1)),
            &field
        ));
    }

    #[test]
    fn test_field_def_deserialize_english_keys() {
        let field: FieldDef = serde_json::from_str(
            r#"{"name": "zip", "type": "number", "required": true, "length": 5, "min": 1}"#,
        )
        .unwrap();
        assert_eq!(field.field_type, FieldType::Number);
        assert!(field.required);
        assert_eq!(field.length, Some(5));
        assert_eq!(field.min, Some(1));
        assert!(field.multiple);
    }

    #[test]
    fn test_field_def_deserialize_spanish_keys() {
        let field: FieldDef = serde_json::from_str(
            r#"{"nombre": "color", "tipo": "radio", "obligatorio": true, "opciones": ["rojo", "azul"], "etiqueta": "Color"}"#,
        )
        .unwrap();
        assert_eq!(field.name, "color");
        assert_eq!(field.field_type, FieldType::Radio);
        assert_eq!(field.options, vec!["rojo", "azul"]);
        assert_eq!(field.display_label(), "Color");
    }

    #[test]
    fn test_field_def_missing_type_is_unspecified() {
        let field: FieldDef = serde_json::from_str(r#"{"name": "free"}"#).unwrap();
        assert_eq!(field.field_type, FieldType::Unknown(String::new()));
        assert_eq!(field.display_label(), "free");
    }
}
