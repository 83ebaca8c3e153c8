//! # dynform-core
//!
//! Core types, settings, and error types shared by every dynform crate.
//! This crate has no dependency on the other dynform crates.
//!
//! ## Modules
//!
//! - [`error`] - Error type and result alias
//! - [`value`] - Submitted and stored field values
//! - [`settings`] - Directory layout and logging configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{DynformError, DynformResult};
pub use settings::Settings;
pub use value::FieldValue;
