//! # dynform-forms
//!
//! Declarative form definitions and the engine that accepts submissions
//! against them.
//!
//! - [`fields`] - field definitions and the per-field validator
//! - [`schema`] - form schemas and their invariants
//! - [`registry`] - loading schemas from a definitions directory
//! - [`submission`] - raw, multi-valued form data
//! - [`validation`] - the field-by-field validation pass
//! - [`engine`] - validation, uniqueness, and persistence in one call
//!
//! Field errors and duplicate-key conflicts are returned as data in a
//! [`Rejection`]; only storage failures surface as errors.

pub mod engine;
pub mod fields;
pub mod registry;
pub mod schema;
pub mod submission;
pub mod validation;

pub use engine::{Rejection, SubmissionEngine, SubmitOutcome};
pub use fields::{validate_value, FieldDef, FieldType};
pub use registry::{FormRegistry, FormSummary};
pub use schema::FormSchema;
pub use submission::RawSubmission;
