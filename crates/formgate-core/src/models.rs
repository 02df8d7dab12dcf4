//! Domain models shared across the formgate crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The four supported form types. Adding a form means adding a variant here
/// and a spec in the API crate; the gate itself never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Contact,
    Career,
    Partner,
    Newsletter,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Contact => "contact",
            FormKind::Career => "career",
            FormKind::Partner => "partner",
            FormKind::Newsletter => "newsletter",
        }
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered field-name → value mapping.
///
/// Submissions arrive as an ordered sequence of fields and the notification
/// template renders rows in that order, so insertion order must survive every
/// transformation. Backed by a Vec of pairs; lookups are linear, which is fine
/// for forms with a handful of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. A replaced key keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `name`, or the empty string when absent.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// A stored attachment, produced once per accepted upload.
///
/// Referenced by the notification dispatcher; deleted again if the dispatch
/// that references it fails.
#[derive(Debug, Clone)]
pub struct AttachmentRecord {
    pub original_name: String,
    pub stored_name: String,
    pub path: PathBuf,
    pub size: u64,
    pub content_type: String,
}

/// Verdict returned by the third-party CAPTCHA scoring service.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaVerdict {
    #[serde(default)]
    pub success: bool,
    pub score: Option<f64>,
    pub action: Option<String>,
}
