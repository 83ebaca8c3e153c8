//! Raw form data for one submission attempt.
//!
//! [`RawSubmission`] is a multi-valued map, like decoded
//! `application/x-www-form-urlencoded` data: a key may appear several times
//! (a checkbox group), and [`get`](RawSubmission::get) returns the first value.

use std::collections::HashMap;

/// Unvalidated field-name -> values mapping from one request.
///
/// # Examples
///
/// ```
/// use dynform_forms::submission::RawSubmission;
///
/// let raw = RawSubmission::parse("name=Ana+Lima&topic=rust&topic=forms");
/// assert_eq!(raw.get("name"), Some("Ana Lima"));
/// assert_eq!(raw.get_list("topic"), ["rust", "forms"]);
/// assert!(raw.get_list("missing").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSubmission {
    data: HashMap<String, Vec<String>>,
}

impl RawSubmission {
    /// Creates an empty submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a submission from `(key, value)` pairs; repeated keys accumulate.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut submission = Self::new();
        for (key, value) in pairs {
            submission.append(key, value);
        }
        submission
    }

    /// Parses a urlencoded body (`+` is a space, `%XX` is decoded, invalid
    /// UTF-8 is replaced).
    pub fn parse(body: &str) -> Self {
        let mut submission = Self::new();
        for pair in body.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            submission.append(form_decode(key), form_decode(value));
        }
        submission
    }

    /// Appends a value for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.entry(key.into()).or_default().push(value.into());
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value for `key`, in submission order.
    pub fn get_list(&self, key: &str) -> &[String] {
        self.data.get(key).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if `key` was submitted at all.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns `true` if nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn form_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}
