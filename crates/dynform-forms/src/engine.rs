//! The submission engine.
//!
//! [`SubmissionEngine::submit`] validates raw form data against a schema,
//! enforces the schema's unique key, and appends the accepted record to a
//! [`RecordStore`]. Field and duplicate-key failures come back as a
//! [`Rejection`]; only storage failures are errors.

use std::collections::BTreeMap;

use dynform_core::logging::submission_span;
use dynform_core::{DynformError, DynformResult, FieldValue};
use dynform_store::{FormLocks, Record, RecordStore};
use tracing::Instrument;

use crate::schema::FormSchema;
use crate::submission::RawSubmission;
use crate::validation::clean_fields;

/// Why a submission was not stored, plus the input for re-display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejection {
    /// Field name -> error message, for every field that failed.
    pub field_errors: BTreeMap<String, String>,
    /// Errors not tied to one field, such as a duplicate unique key.
    pub general_errors: Vec<String>,
    /// The extracted (uncoerced) submission, in schema order.
    pub data: Record,
}

impl Rejection {
    /// Returns the error for `field`, if it failed.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    /// Returns the total number of errors.
    pub fn error_count(&self) -> usize {
        self.field_errors.len() + self.general_errors.len()
    }
}

/// The result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The record was stored.
    Accepted,
    /// Nothing was stored.
    Rejected(Rejection),
}

impl SubmitOutcome {
    /// Returns `true` if the record was stored.
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns the rejection, if any.
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Validates submissions and persists accepted records.
///
/// The engine holds the form's lock from the uniqueness check through the
/// append, so two submissions racing on one form cannot both pass the check
/// or overwrite each other's structured write. Share one engine (or engines
/// built [`with_locks`](Self::with_locks) over the same [`FormLocks`]) across
/// every task writing to a store.
///
/// # Examples
///
/// ```
/// use dynform_forms::{FieldDef, FieldType, FormSchema, RawSubmission, SubmissionEngine};
/// use dynform_store::{InMemoryRecordStore, RecordStore};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let schema = FormSchema::new("newsletter", "Newsletter")
///     .field(FieldDef::new("email", FieldType::Email).required(true))
///     .unique_key("email");
/// let engine = SubmissionEngine::new(InMemoryRecordStore::new());
///
/// let first = engine.submit(&schema, &RawSubmission::parse("email=a%40b.com")).await.unwrap();
/// assert!(first.is_accepted());
///
/// let again = engine.submit(&schema, &RawSubmission::parse("email=a%40b.com")).await.unwrap();
/// assert_eq!(again.rejection().unwrap().general_errors.len(), 1);
/// assert_eq!(engine.store().load("newsletter").await.unwrap().len(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct SubmissionEngine<S> {
    store: S,
    locks: FormLocks,
}

impl<S: RecordStore> SubmissionEngine<S> {
    /// Creates an engine with its own lock registry.
    pub fn new(store: S) -> Self {
        Self::with_locks(store, FormLocks::new())
    }

    /// Creates an engine sharing an existing lock registry.
    pub const fn with_locks(store: S, locks: FormLocks) -> Self {
        Self { store, locks }
    }

    /// Returns the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the lock registry.
    pub const fn locks(&self) -> &FormLocks {
        &self.locks
    }

    /// Processes one submission against `schema`.
    ///
    /// Returns [`DynformError::PermissionDenied`] for an inactive schema and
    /// propagates storage errors. Every other failure is a
    /// [`SubmitOutcome::Rejected`], and a rejected submission leaves the store
    /// untouched.
    pub async fn submit(
        &self,
        schema: &FormSchema,
        raw: &RawSubmission,
    ) -> DynformResult<SubmitOutcome> {
        if !schema.active {
            return Err(DynformError::PermissionDenied(format!(
                "Form '{}' is not accepting submissions",
                schema.name
            )));
        }

        self.submit_active(schema, raw)
            .instrument(submission_span(&schema.name))
            .await
    }

    async fn submit_active(
        &self,
        schema: &FormSchema,
        raw: &RawSubmission,
    ) -> DynformResult<SubmitOutcome> {
        let mut data = Record::new();
        let mut field_errors = BTreeMap::new();
        clean_fields(&schema.fields, raw, &mut data, &mut field_errors);

        let _guard = self.locks.acquire(&schema.name).await;

        let mut general_errors = Vec::new();
        if let Some(key) = &schema.unique_key {
            let value = data.get(key).cloned().unwrap_or_default();
            // Compare in stored form: "a,b" is on disk as ["a", "b"].
            let candidate = Record::coerce_value(value.clone());
            if self.store.exists(&schema.name, key, &candidate).await? {
                tracing::debug!(key = %key, "duplicate unique key");
                general_errors.push(duplicate_message(key, &value));
            }
        }

        if !field_errors.is_empty() || !general_errors.is_empty() {
            tracing::debug!(
                field_errors = field_errors.len(),
                general_errors = general_errors.len(),
                "submission rejected"
            );
            return Ok(SubmitOutcome::Rejected(Rejection {
                field_errors,
                general_errors,
                data,
            }));
        }

        self.store
            .append(&schema.name, Record::coerced(data))
            .await?;
        tracing::info!("record stored");
        Ok(SubmitOutcome::Accepted)
    }
}

fn duplicate_message(key: &str, value: &FieldValue) -> String {
    format!("A record with {key}: {value} already exists.")
}

#[cfg(test)]
mod tests {
    use dynform_store::InMemoryRecordStore;

    use super::*;
    use crate::fields::{FieldDef, FieldType};
    use crate::validation::{FORMAT_MESSAGE, REQUIRED_MESSAGE};

    fn newsletter() -> FormSchema {
        FormSchema::new("newsletter", "Newsletter")
            .field(FieldDef::new("name", FieldType::Text).required(true))
            .field(FieldDef::new("email", FieldType::Email).required(true))
            .unique_key("email")
    }

    #[tokio::test]
    async fn test_accepts_and_stores_in_schema_order() {
        let engine = SubmissionEngine::new(InMemoryRecordStore::new());
        let raw = RawSubmission::parse("email=ana%40x.com&name=Ana");

        let outcome = engine.submit(&newsletter(), &raw).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Accepted);

        let records = engine.store().load("newsletter").await.unwrap();
        assert_eq!(records.len(), 1);
        let names: Vec<&str> = records[0].field_names().collect();
        assert_eq!(names, vec!["name", "email"]);
    }

    #[tokio::test]
    async fn test_field_errors_store_nothing() {
        let engine = SubmissionEngine::new(InMemoryRecordStore::new());
        let raw = RawSubmission::parse("email=not-an-email");

        let outcome = engine.submit(&newsletter(), &raw).await.unwrap();
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.field_error("name"), Some(REQUIRED_MESSAGE));
        assert_eq!(rejection.field_error("email"), Some(FORMAT_MESSAGE));
        assert!(rejection.general_errors.is_empty());
        assert_eq!(rejection.data.get("email"), Some(&FieldValue::from("not-an-email")));
        assert!(engine.store().load("newsletter").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_key_is_general_error() {
        let engine = SubmissionEngine::new(InMemoryRecordStore::new());
        let schema = newsletter();
        let raw = RawSubmission::parse("name=Ana&email=ana%40x.com");
        engine.submit(&schema, &raw).await.unwrap();

        let outcome = engine.submit(&schema, &raw).await.unwrap();
        let rejection = outcome.rejection().unwrap();
        assert!(rejection.field_errors.is_empty());
        assert_eq!(
            rejection.general_errors,
            vec!["A record with email: ana@x.com already exists."]
        );
        assert_eq!(engine.store().load("newsletter").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_and_field_errors_are_reported_together() {
        let engine = SubmissionEngine::new(InMemoryRecordStore::new());
        let schema = newsletter();
        engine
            .submit(&schema, &RawSubmission::parse("name=Ana&email=ana%40x.com"))
            .await
            .unwrap();

        let outcome = engine
            .submit(&schema, &RawSubmission::parse("email=ana%40x.com"))
            .await
            .unwrap();
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.error_count(), 2);
    }

    #[tokio::test]
    async fn test_accepted_record_is_coerced() {
        let engine = SubmissionEngine::new(InMemoryRecordStore::new());
        let schema = FormSchema::new("places", "Places")
            .field(FieldDef::new("visited", FieldType::Text));

        engine
            .submit(&schema, &RawSubmission::parse("visited=a%2Cb%2Cc"))
            .await
            .unwrap();
        let records = engine.store().load("places").await.unwrap();
        assert_eq!(
            records[0].get("visited"),
            Some(&FieldValue::from(vec!["a", "b", "c"]))
        );
    }

    #[tokio::test]
    async fn test_inactive_schema_is_refused() {
        let engine = SubmissionEngine::new(InMemoryRecordStore::new());
        let schema = newsletter().active(false);
        let err = engine
            .submit(&schema, &RawSubmission::parse("name=Ana&email=a%40b.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DynformError::PermissionDenied(_)));
        assert!(engine.locks().is_empty());
    }

    #[tokio::test]
    async fn test_without_unique_key_duplicates_are_kept() {
        let engine = SubmissionEngine::new(InMemoryRecordStore::new());
        let schema = FormSchema::new("feedback", "Feedback")
            .field(FieldDef::new("comment", FieldType::Textarea));
        let raw = RawSubmission::parse("comment=great");
        engine.submit(&schema, &raw).await.unwrap();
        engine.submit(&schema, &raw).await.unwrap();
        assert_eq!(engine.store().load("feedback").await.unwrap().len(), 2);
    }
}
