//! Settings for dynform.
//!
//! [`Settings`] says where form definitions live, where records are written,
//! and how verbose logging is. Load it with [`settings_loader`](crate::settings_loader).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The complete set of dynform settings.
///
/// # Examples
///
/// ```
/// use dynform_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.forms_dir.to_str(), Some("forms"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The log filter directive (e.g. "info", "dynform_store=debug").
    pub log_level: String,
    /// Directory holding one definition document per form.
    pub forms_dir: PathBuf,
    /// Directory holding the structured and tabular record stores.
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            forms_dir: PathBuf::from("forms"),
            data_dir: PathBuf::from("data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
        assert_eq!(s.forms_dir, PathBuf::from("forms"));
        assert_eq!(s.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_settings_json_round_trip() {
        let mut s = Settings::default();
        s.data_dir = PathBuf::from("/var/lib/dynform");
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data_dir, PathBuf::from("/var/lib/dynform"));
    }
}
