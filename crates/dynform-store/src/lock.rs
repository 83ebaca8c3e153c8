//! Per-form serialization.
//!
//! [`FormLocks`] lazily creates one async mutex per form name and hands out
//! owned guards. Holding a guard across "check for duplicates, then append"
//! makes that sequence atomic for every writer in the process that goes
//! through the same `FormLocks`. Different forms never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

/// A registry of per-form-name async mutexes. Clones share the registry.
#[derive(Debug, Default, Clone)]
pub struct FormLocks {
    locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl FormLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `form` and returns a guard that releases
    /// it on drop.
    pub async fn acquire(&self, form: &str) -> FormGuard {
        let lock = self.lock_for(form);
        let guard = lock.lock_owned().await;
        tracing::trace!(form, "form lock acquired");
        FormGuard {
            form: form.to_string(),
            _guard: guard,
        }
    }

    /// Returns the number of forms that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no form has been locked yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_for(&self, form: &str) -> Arc<tokio::sync::Mutex<()>> {
        // The map only ever grows, so a poisoned map is still consistent.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(form.to_string()).or_default())
    }
}

/// Exclusive access to one form, released on drop.
#[derive(Debug)]
pub struct FormGuard {
    form: String,
    _guard: OwnedMutexGuard<()>,
}

impl FormGuard {
    /// Returns the name of the locked form.
    pub fn form(&self) -> &str {
        &self.form
    }
}
