//! Raw and validated value shapes.
//!
//! The orchestrator receives either a scalar string, a list (multi-choice),
//! or a field-keyed map (composite elements such as file uploads). Validation
//! returns the same shape, normalized.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value as received from the client, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Many(Vec<String>),
    Fields(BTreeMap<String, String>),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// True when there is nothing to validate: empty/whitespace scalar, empty
    /// list, or a field map whose `_main` facet is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Text(value) => value.trim().is_empty(),
            RawValue::Many(values) => values.iter().all(|v| v.trim().is_empty()),
            RawValue::Fields(fields) => fields
                .get(MAIN_FACET)
                .is_none_or(|v| v.trim().is_empty()),
        }
    }
}

/// Key of the primary facet in a composite field map.
pub const MAIN_FACET: &str = "_main";

/// Validated, normalized value stored on the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Empty,
    Text(String),
    Many(Vec<String>),
    Fields(BTreeMap<String, String>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(value) => value.is_empty(),
            FieldValue::Many(values) => values.is_empty(),
            FieldValue::Fields(fields) => fields.is_empty(),
        }
    }

    /// The scalar projection used by display paths: the text itself, the
    /// `_main` facet for composites, empty string when nothing is there.
    pub fn main_text(&self) -> &str {
        match self {
            FieldValue::Empty => "",
            FieldValue::Text(value) => value,
            FieldValue::Many(values) => values.first().map_or("", String::as_str),
            FieldValue::Fields(fields) => fields.get(MAIN_FACET).map_or("", String::as_str),
        }
    }
}
