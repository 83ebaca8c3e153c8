//! The record store abstraction.

use async_trait::async_trait;
use dynform_core::{DynformError, DynformResult, FieldValue};

use crate::record::Record;

/// Persistence for the records of every form, scoped by form name.
///
/// Implementations keep the structured and tabular representations in step:
/// after a successful [`append`](RecordStore::append), [`load`](RecordStore::load)
/// includes the new record and the tabular export has one more row.
///
/// Stores do not serialize writers. Two concurrent `append` calls for the same
/// form can both read the same prior collection, and the later structured
/// write then drops the earlier record. Callers that need more hold a
/// [`FormLocks`](crate::lock::FormLocks) guard around check-and-append.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every stored record for `form`, oldest first. A form with no
    /// stored records yields an empty vector.
    async fn load(&self, form: &str) -> DynformResult<Vec<Record>>;

    /// Returns `true` if any stored record has `record[key] == value`.
    ///
    /// This is a linear scan over [`load`](RecordStore::load).
    async fn exists(&self, form: &str, key: &str, value: &FieldValue) -> DynformResult<bool> {
        let records = self.load(form).await?;
        Ok(records.iter().any(|record| record.get(key) == Some(value)))
    }

    /// Appends one record to both representations.
    ///
    /// The structured store is rewritten as a whole, then one tabular row is
    /// appended. There is no two-phase commit: a crash between the two writes
    /// leaves the structured store one record ahead of the tabular export.
    async fn append(&self, form: &str, record: Record) -> DynformResult<()>;
}

/// What to do when a form's structured store exists but is not valid JSON.
///
/// Valid JSON that is not an array of records is always a
/// [`DynformError::Storage`] error and is never overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptStorePolicy {
    /// Log a warning and treat the prior history as empty. The next append
    /// overwrites the unreadable document.
    #[default]
    TreatAsEmpty,
    /// Surface the corruption as a [`DynformError::Storage`] error.
    Fail,
}

impl CorruptStorePolicy {
    /// Applies the policy to a parse failure of `form`'s structured store.
    pub fn recover(self, form: &str, reason: &str) -> DynformResult<Vec<Record>> {
        match self {
            Self::TreatAsEmpty => {
                tracing::warn!(
                    form,
                    reason,
                    "structured store is corrupt; treating prior records as empty"
                );
                Ok(Vec::new())
            }
            Self::Fail => Err(DynformError::Storage(format!(
                "structured store for form '{form}' is corrupt: {reason}"
            ))),
        }
    }
}

/// Checks that `name` is usable as a storage identity (a file stem).
///
/// Empty names and names containing path separators, `..`, or NUL are
/// rejected with [`DynformError::SuspiciousOperation`].
pub fn check_form_name(name: &str) -> DynformResult<()> {
    let suspicious = name.is_empty()
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");
    if suspicious {
        return Err(DynformError::SuspiciousOperation(format!(
            "invalid form name '{}'",
            name.escape_debug()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_form_name() {
        assert!(check_form_name("newsletter").is_ok());
        assert!(check_form_name("sign-up_2024").is_ok());
        assert!(check_form_name("").is_err());
        assert!(check_form_name("../etc/passwd").is_err());
        assert!(check_form_name("a/b").is_err());
        assert!(check_form_name("a\\b").is_err());
    }

    #[test]
    fn test_check_form_name_status() {
        let err = check_form_name("..").unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_corrupt_policy_treat_as_empty() {
        let records = CorruptStorePolicy::TreatAsEmpty
            .recover("survey", "expected value")
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_corrupt_policy_fail() {
        let err = CorruptStorePolicy::Fail
            .recover("survey", "expected value")
            .unwrap_err();
        assert!(matches!(err, DynformError::Storage(_)));
        assert!(err.to_string().contains("survey"));
    }
}
