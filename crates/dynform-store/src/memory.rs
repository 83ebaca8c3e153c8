//! In-process record store, suitable for tests and embedding.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dynform_core::DynformResult;

use crate::record::Record;
use crate::store::{check_form_name, RecordStore};
use crate::tabular;

#[derive(Debug, Default)]
struct FormData {
    records: Vec<Record>,
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

/// A record store that holds both representations in memory.
///
/// Records are lost when the store is dropped. Clones share the same data.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    forms: Arc<RwLock<HashMap<String, FormData>>>,
}

impl InMemoryRecordStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `form`'s tabular export, header row first.
    pub async fn tabular_rows(&self, form: &str) -> Vec<Vec<String>> {
        let forms = self.forms.read().await;
        forms.get(form).map_or_else(Vec::new, |data| {
            data.header
                .iter()
                .cloned()
                .chain(data.rows.iter().cloned())
                .collect()
        })
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn load(&self, form: &str) -> DynformResult<Vec<Record>> {
        check_form_name(form)?;
        let forms = self.forms.read().await;
        Ok(forms
            .get(form)
            .map(|data| data.records.clone())
            .unwrap_or_default())
    }

    async fn append(&self, form: &str, record: Record) -> DynformResult<()> {
        check_form_name(form)?;
        let mut forms = self.forms.write().await;
        let data = forms.entry(form.to_string()).or_default();

        let header = data
            .header
            .get_or_insert_with(|| tabular::header_for(&record));
        let row = tabular::row_for(form, header, &record);
        data.rows.push(row);
        data.records.push(record);
        Ok(())
    }
}
