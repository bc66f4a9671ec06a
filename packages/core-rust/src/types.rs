use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Runtime value of a single form field.
///
/// Mirrors the value union the TypeScript form pages pass around
/// (`string | boolean | File[] | undefined`). Used as the concrete value type
/// in [`FormValues`] and handed to every validator and visibility predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Field has no value yet (the TS `undefined` case).
    Unset,
    /// Checkbox / toggle state.
    Bool(bool),
    /// Free-text input.
    Text(String),
    /// Files selected in an upload field.
    Files(Vec<UploadFile>),
}

impl FieldValue {
    /// Returns true for [`FieldValue::Unset`].
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }

    /// Returns the text content, or `None` for non-text values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean content, or `None` for non-bool values.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the file list, or `None` for non-file values.
    #[must_use]
    pub fn as_files(&self) -> Option<&[UploadFile]> {
        match self {
            FieldValue::Files(files) => Some(files),
            _ => None,
        }
    }

    /// Convenience: true if this is `Bool(true)`.
    ///
    /// Visibility predicates over checkbox fields (the "private garage"
    /// toggle revealing the garage-key fields) read better with this.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        matches!(self, FieldValue::Bool(true))
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Unset
    }
}

/// The full value map of one form instance, keyed by field `state_key`.
///
/// Uses `BTreeMap` for deterministic iteration order.
pub type FormValues = BTreeMap<String, FieldValue>;

/// A file the user selected for upload.
///
/// The core never reads file contents; identity is the file name and the
/// only other attribute the UI needs is the byte size for display. Maps to
/// the `{ name, size }` subset of the DOM `File` the TypeScript client holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFile {
    /// File name as selected, including extension.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

impl UploadFile {
    /// Creates an upload file handle from a name and byte size.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}
