//! Validation error taxonomy.
//!
//! Element validation returns errors as values so the caller can aggregate
//! every failing element of a container before stopping.

use serde::{Deserialize, Serialize};

use crate::ids::ElementId;

/// Kind of a per-element validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Required element left empty.
    Required,
    /// Below the configured minimum (length, selection count, or numeric bound).
    TooShort,
    /// Above the configured maximum (length, selection count, or numeric bound).
    TooLong,
    /// Submitted value not present in the element's choice set.
    InvalidChoice,
    /// Pattern or structural check failed (email/URL/numeric, upload metadata).
    InvalidFormat,
}

impl ValidationErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationErrorKind::Required => "required",
            ValidationErrorKind::TooShort => "too_short",
            ValidationErrorKind::TooLong => "too_long",
            ValidationErrorKind::InvalidChoice => "invalid_choice",
            ValidationErrorKind::InvalidFormat => "invalid_format",
        }
    }
}

/// One validation failure for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub element_id: ElementId,
    pub kind: ValidationErrorKind,
    /// User-facing message.
    pub message: String,
}

impl ValidationError {
    pub fn new(
        element_id: ElementId,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            element_id,
            kind,
            message: message.into(),
        }
    }
}
