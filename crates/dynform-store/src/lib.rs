//! # dynform-store
//!
//! Append-only persistence of accepted submissions. Every form's records are
//! kept in two representations that must stay in step:
//!
//! - a **structured store**: the whole collection as a JSON array, rewritten
//!   on every append, with multi-valued fields kept as arrays;
//! - a **tabular store**: a CSV export, appended one row at a time, with
//!   multi-valued fields flattened using `|`.
//!
//! [`RecordStore`] is the seam the submission engine talks to.
//! [`FileRecordStore`] is the on-disk implementation and
//! [`InMemoryRecordStore`] the in-process one. [`FormLocks`] provides the
//! per-form serialization point that callers hold around check-and-append.

pub mod file;
pub mod lock;
pub mod memory;
pub mod record;
pub mod store;
pub mod tabular;

pub use file::FileRecordStore;
pub use lock::{FormGuard, FormLocks};
pub use memory::InMemoryRecordStore;
pub use record::Record;
pub use store::{check_form_name, CorruptStorePolicy, RecordStore};
