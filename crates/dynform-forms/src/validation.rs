//! The field-by-field validation pass.
//!
//! Every field is checked and every failure is reported; one bad field never
//! hides another. Checks are pure: nothing here touches storage.

use std::collections::BTreeMap;

use dynform_core::FieldValue;
use dynform_store::Record;

use crate::fields::{validate_value, FieldDef};
use crate::submission::RawSubmission;

/// Message for a required field submitted empty.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message for a value rejected by its field type's rule.
pub const FORMAT_MESSAGE: &str = "The value does not match the required format.";

/// Extracts `field`'s value from raw form data.
///
/// Checkbox groups take every submitted value, unmodified. Other types take
/// the first value with surrounding whitespace trimmed. Absent keys yield an
/// empty value.
pub fn extract_value(field: &FieldDef, raw: &RawSubmission) -> FieldValue {
    if field.field_type.is_multi_valued() {
        FieldValue::Multi(raw.get_list(&field.name).to_vec())
    } else {
        FieldValue::Scalar(raw.get(&field.name).unwrap_or_default().trim().to_string())
    }
}

/// Checks one extracted value, returning the error message if it is rejected.
///
/// The required check runs first; a required field left empty is not also
/// run through its type rule.
pub fn check_field(field: &FieldDef, value: &FieldValue) -> Option<&'static str> {
    if field.required && value.is_empty() {
        Some(REQUIRED_MESSAGE)
    } else if !validate_value(value, field) {
        Some(FORMAT_MESSAGE)
    } else {
        None
    }
}

/// Validates every field in schema order.
///
/// Each extracted value is inserted into `data` (valid or not, so a rejected
/// form can be redisplayed with the user's input), and each failure is
/// recorded in `errors` keyed by field name.
pub fn clean_fields(
    fields: &[FieldDef],
    raw: &RawSubmission,
    data: &mut Record,
    errors: &mut BTreeMap<String, String>,
) {
    for field in fields {
        let value = extract_value(field, raw);
        if let Some(message) = check_field(field, &value) {
            tracing::debug!(field = %field.name, message, "field rejected");
            errors.insert(field.name.clone(), message.to_string());
        }
        data.insert(field.name.clone(), value);
    }
}
