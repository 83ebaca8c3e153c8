//! File-backed record store.
//!
//! Each form owns two files in the data directory:
//!
//! - `{form}.json`: the structured store, a JSON array of records indented
//!   with four spaces, non-ASCII text written verbatim;
//! - `{form}.csv`: the tabular export (see [`tabular`](crate::tabular)).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use dynform_core::{DynformError, DynformResult};

use crate::record::Record;
use crate::store::{check_form_name, CorruptStorePolicy, RecordStore};
use crate::tabular;

/// A record store that keeps one JSON document and one CSV file per form.
///
/// The data directory is created on the first append.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    data_dir: PathBuf,
    corrupt_policy: CorruptStorePolicy,
}

impl FileRecordStore {
    /// Creates a store rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            corrupt_policy: CorruptStorePolicy::default(),
        }
    }

    /// Sets the policy applied when a structured store cannot be parsed.
    #[must_use]
    pub const fn with_corrupt_policy(mut self, policy: CorruptStorePolicy) -> Self {
        self.corrupt_policy = policy;
        self
    }

    /// Returns the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the path of `form`'s structured store.
    pub fn structured_path(&self, form: &str) -> DynformResult<PathBuf> {
        check_form_name(form)?;
        Ok(self.data_dir.join(format!("{form}.json")))
    }

    /// Returns the path of `form`'s tabular export.
    pub fn tabular_path(&self, form: &str) -> DynformResult<PathBuf> {
        check_form_name(form)?;
        Ok(self.data_dir.join(format!("{form}.csv")))
    }

    /// Reads `form`'s tabular export, header row first. A form with no export
    /// yields an empty vector.
    pub async fn tabular_rows(&self, form: &str) -> DynformResult<Vec<Vec<String>>> {
        match read_optional(&self.tabular_path(form)?).await? {
            Some(bytes) => tabular::decode_rows(&bytes),
            None => Ok(Vec::new()),
        }
    }

    async fn ensure_dir(&self) -> DynformResult<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| {
                DynformError::Storage(format!(
                    "Failed to create data directory '{}': {e}",
                    self.data_dir.display()
                ))
            })
    }

    /// Replaces the structured store with `records` via a temporary file.
    async fn write_structured(&self, form: &str, records: &[Record]) -> DynformResult<()> {
        let mut content = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
        records.serialize(&mut serializer).map_err(|e| {
            DynformError::SerializationError(format!("Failed to serialize records: {e}"))
        })?;

        let path = self.structured_path(form)?;
        let tmp_path = self.data_dir.join(format!("{form}.json.tmp"));
        tokio::fs::write(&tmp_path, &content).await.map_err(|e| {
            DynformError::Storage(format!(
                "Failed to write structured store '{}': {e}",
                tmp_path.display()
            ))
        })?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(|e| {
            DynformError::Storage(format!(
                "Failed to replace structured store '{}': {e}",
                path.display()
            ))
        })
    }

    /// Appends one row for `record`, writing the header first if the export
    /// is new or empty.
    async fn append_tabular(&self, form: &str, record: &Record) -> DynformResult<()> {
        let path = self.tabular_path(form)?;
        let existing_header = match read_optional(&path).await? {
            Some(bytes) => tabular::read_header(&bytes)?,
            None => None,
        };

        let rows = match existing_header {
            Some(header) => vec![tabular::row_for(form, &header, record)],
            None => {
                let header = tabular::header_for(record);
                let row = tabular::row_for(form, &header, record);
                vec![header, row]
            }
        };
        let bytes = tabular::encode_rows(&rows)?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| {
                DynformError::Storage(format!(
                    "Failed to open tabular store '{}': {e}",
                    path.display()
                ))
            })?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn load(&self, form: &str) -> DynformResult<Vec<Record>> {
        let Some(bytes) = read_optional(&self.structured_path(form)?).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_slice::<Vec<Record>>(&bytes) {
            Ok(records) => Ok(records),
            // Well-formed JSON of the wrong shape is never overwritten.
            Err(e) if e.is_data() => Err(DynformError::Storage(format!(
                "structured store for form '{form}' is not an array of records: {e}"
            ))),
            Err(e) => self.corrupt_policy.recover(form, &e.to_string()),
        }
    }

    async fn append(&self, form: &str, record: Record) -> DynformResult<()> {
        self.ensure_dir().await?;

        let mut records = self.load(form).await?;
        records.push(record.clone());
        self.write_structured(form, &records).await?;
        self.append_tabular(form, &record).await?;

        tracing::debug!(form, total = records.len(), "record appended");
        Ok(())
    }
}

/// Reads a whole file, mapping "not found" to `None`.
async fn read_optional(path: &Path) -> DynformResult<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DynformError::Storage(format!(
            "Failed to read '{}': {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use dynform_core::FieldValue;

    use super::*;

    fn record(email: &str) -> Record {
        Record::from_pairs(vec![
            ("email", FieldValue::from(email)),
            ("topics", FieldValue::from(vec!["rust", "forms"])),
        ])
    }

    #[tokio::test]
    async fn test_load_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(dir.path());
        assert!(store.load("survey").await.unwrap().is_empty());
        assert!(store.tabular_rows("survey").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(dir.path());

        store.append("survey", record("a@b.com")).await.unwrap();
        store.append("survey", record("c@d.com")).await.unwrap();

        let records = store.load("survey").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records.last(), Some(&record("c@d.com")));
        assert_eq!(
            records[0].get("topics"),
            Some(&FieldValue::from(vec!["rust", "forms"]))
        );
    }

    #[tokio::test]
    async fn test_structured_and_tabular_counts_match() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(dir.path());

        for i in 0..5 {
            store
                .append("survey", record(&format!("user{i}@example.com")))
                .await
                .unwrap();
        }

        let records = store.load("survey").await.unwrap();
        let rows = store.tabular_rows("survey").await.unwrap();
        assert_eq!(records.len(), rows.len() - 1);
        assert_eq!(rows[0], vec!["email", "topics"]);
        assert_eq!(rows[1], vec!["user0@example.com", "rust|forms"]);
    }

    #[tokio::test]
    async fn test_structured_format_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(dir.path());
        store
            .append(
                "survey",
                Record::from_pairs(vec![("name", FieldValue::from("José"))]),
            )
            .await
            .unwrap();

        let content = std::fs::read_to_string(dir.path().join("survey.json")).unwrap();
        assert_eq!(content, "[\n    {\n        \"name\": \"José\"\n    }\n]");
        let csv = std::fs::read_to_string(dir.path().join("survey.csv")).unwrap();
        assert_eq!(csv, "name\r\nJosé\r\n");
    }

    #[tokio::test]
    async fn test_corrupt_store_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("survey.json"), "[{not json").unwrap();
        let store = FileRecordStore::new(dir.path());

        assert!(store.load("survey").await.unwrap().is_empty());

        store.append("survey", record("a@b.com")).await.unwrap();
        assert_eq!(store.load("survey").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_store_fail_policy() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("survey.json"), "[{not json").unwrap();
        let store =
            FileRecordStore::new(dir.path()).with_corrupt_policy(CorruptStorePolicy::Fail);

        let err = store.load("survey").await.unwrap_err();
        assert!(matches!(err, DynformError::Storage(_)));
    }

    #[tokio::test]
    async fn test_foreign_values_survive_append() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("survey.json"),
            r#"[{"email":"a@b.com","age":30},{"email":"c@d.com","age":null}]"#,
        )
        .unwrap();
        let store = FileRecordStore::new(dir.path());

        let before = store.load("survey").await.unwrap();
        assert_eq!(before.len(), 2);
        assert_eq!(
            before[0].get("age"),
            Some(&FieldValue::Other(serde_json::json!(30)))
        );

        store
            .append("survey", Record::from_pairs(vec![("email", "e@f.com")]))
            .await
            .unwrap();

        let on_disk = std::fs::read_to_string(dir.path().join("survey.json")).unwrap();
        assert!(on_disk.contains("a@b.com"));
        assert!(on_disk.contains("\"age\": 30"));
        assert!(on_disk.contains("\"age\": null"));
        let records = store.load("survey").await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[..2], before[..]);
    }

    #[tokio::test]
    async fn test_wrong_shape_store_is_error_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.json");
        std::fs::write(&path, r#"{"email": "a@b.com"}"#).unwrap();
        let store = FileRecordStore::new(dir.path());

        let err = store.load("survey").await.unwrap_err();
        assert!(matches!(err, DynformError::Storage(_)));

        let err = store.append("survey", record("c@d.com")).await.unwrap_err();
        assert!(matches!(err, DynformError::Storage(_)));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{"email": "a@b.com"}"#
        );
    }

    #[tokio::test]
    async fn test_append_fails_when_data_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::write(&data_dir, "not a directory").unwrap();
        let store = FileRecordStore::new(&data_dir);

        let err = store.append("survey", record("a@b.com")).await.unwrap_err();
        assert!(matches!(err, DynformError::Storage(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_exists_scans_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(dir.path());
        store.append("survey", record("a@b.com")).await.unwrap();

        let hit = FieldValue::from("a@b.com");
        let miss = FieldValue::from("z@b.com");
        assert!(store.exists("survey", "email", &hit).await.unwrap());
        assert!(!store.exists("survey", "email", &miss).await.unwrap());
        assert!(!store.exists("other", "email", &hit).await.unwrap());
    }

    #[tokio::test]
    async fn test_later_record_with_new_fields_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(dir.path());
        store
            .append("survey", Record::from_pairs(vec![("a", "1"), ("b", "2")]))
            .await
            .unwrap();
        store
            .append("survey", Record::from_pairs(vec![("b", "3"), ("c", "4")]))
            .await
            .unwrap();

        let rows = store.tabular_rows("survey").await.unwrap();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"], vec!["", "3"]]);
        // The structured store keeps the extra field.
        let records = store.load("survey").await.unwrap();
        assert_eq!(records[1].get("c"), Some(&FieldValue::from("4")));
    }

    #[tokio::test]
    async fn test_forms_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(dir.path());
        store.append("one", record("a@b.com")).await.unwrap();

        assert_eq!(store.load("one").await.unwrap().len(), 1);
        assert!(store.load("two").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(dir.path());
        let err = store.load("../secrets").await.unwrap_err();
        assert!(matches!(err, DynformError::SuspiciousOperation(_)));
    }
}
