//! # dynform
//!
//! Declarative forms for Rust. A form is a schema of typed fields loaded
//! from a JSON or TOML definition; submissions are validated field by field,
//! checked against an optional unique key, and stored as both a JSON
//! document and a CSV export.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//!
//! ```rust
//! use dynform::prelude::*;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let schema = FormSchema::new("contact", "Contact")
//!     .field(FieldDef::new("email", FieldType::Email).required(true));
//! let engine = SubmissionEngine::new(InMemoryRecordStore::new());
//!
//! let outcome = engine
//!     .submit(&schema, &RawSubmission::parse("email=x"))
//!     .await
//!     .unwrap();
//! assert!(!outcome.is_accepted());
//! # });
//! ```

/// Error type, settings, logging, and the submitted value type.
pub use dynform_core as core;

/// Record persistence: JSON document store, CSV export, per-form locks.
pub use dynform_store as store;

/// Field definitions, schemas, the schema registry, and the submission engine.
pub use dynform_forms as forms;

/// The `dynform` command-line tool.
#[cfg(feature = "cli")]
pub use dynform_cli as cli;

// Third-party re-exports
pub use async_trait;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
pub use tracing_subscriber;

/// The types most programs need.
pub mod prelude {
    pub use dynform_core::{DynformError, DynformResult, FieldValue, Settings};
    pub use dynform_forms::{
        FieldDef, FieldType, FormRegistry, FormSchema, FormSummary, RawSubmission, Rejection,
        SubmissionEngine, SubmitOutcome,
    };
    pub use dynform_store::{
        CorruptStorePolicy, FileRecordStore, FormLocks, InMemoryRecordStore, Record, RecordStore,
    };
}
