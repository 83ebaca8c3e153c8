//! Error type for the dynform crates.
//!
//! Field-level validation failures and duplicate-key conflicts are *not*
//! errors: the submission engine returns them as data. [`DynformError`] covers
//! what is left over: missing or inactive form definitions, broken
//! configuration, suspicious storage identities, and storage I/O failures.

use thiserror::Error;

/// The primary error type for dynform.
///
/// Each variant maps to an HTTP-equivalent status code via
/// [`DynformError::status_code`], so a routing layer can turn it into a
/// response without inspecting the message.
#[derive(Error, Debug)]
pub enum DynformError {
    // ── Lookup ───────────────────────────────────────────────────────

    /// The request itself was malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A form definition (or other named resource) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The form exists but is not accepting display or submissions.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A settings value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A form definition violates a schema invariant.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── Storage ──────────────────────────────────────────────────────

    /// A record store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ── Security ─────────────────────────────────────────────────────

    /// A name would escape its storage directory.
    #[error("Suspicious operation: {0}")]
    SuspiciousOperation(String),
}

impl DynformError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `BadRequest` -> 400
    /// - `PermissionDenied`, `SuspiciousOperation` -> 403
    /// - `NotFound` -> 404
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::PermissionDenied(_) | Self::SuspiciousOperation(_) => 403,
            Self::NotFound(_) => 404,
            Self::ConfigurationError(_)
            | Self::ImproperlyConfigured(_)
            | Self::Storage(_)
            | Self::SerializationError(_)
            | Self::Io(_) => 500,
        }
    }
}

/// A convenience type alias for `Result<T, DynformError>`.
pub type DynformResult<T> = Result<T, DynformError>;
