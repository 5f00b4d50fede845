//! Per-container value accumulation.
//!
//! One pass over a container validates every input element and records each
//! result here; errors are aggregated so the visitor sees every failing
//! element at once, and validated values merge into the submission only when
//! the whole container is clean.

use std::collections::BTreeMap;

use forms_model::{ElementId, FieldValue, Submission, ValidationError};

#[derive(Debug, Default)]
pub struct ValueStore {
    values: BTreeMap<ElementId, FieldValue>,
    errors: Vec<ValidationError>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one element's validation result.
    pub fn record(&mut self, id: ElementId, result: Result<FieldValue, ValidationError>) {
        match result {
            Ok(value) => {
                self.values.insert(id, value);
            }
            Err(error) => self.errors.push(error),
        }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Move every validated value onto the submission. Only valid on a clean
    /// store; a store with errors has nothing the submission should keep.
    pub fn merge_into(self, submission: &mut Submission) {
        debug_assert!(self.errors.is_empty());
        submission.values.extend(self.values);
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}
