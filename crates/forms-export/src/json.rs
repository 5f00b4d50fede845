//! Structured JSON projection.
//!
//! Unlike the flat CSV table, this keeps the value shapes: lists stay lists,
//! composite field maps stay maps.

use std::io::Write;

use serde_json::{Map, Value, json};

use forms_elements::ElementTypeRegistry;
use forms_model::{Form, Submission};

use crate::error::ExportError;

/// Project `submissions` of `form` into a JSON array, one object per
/// submission. Values of unresolvable element types export as empty strings,
/// matching the CSV projection.
pub fn to_json(
    registry: &ElementTypeRegistry,
    form: &Form,
    submissions: &[Submission],
) -> Result<Value, ExportError> {
    let mut rows = Vec::with_capacity(submissions.len());
    for submission in submissions {
        let mut values = Map::new();
        for element in form.elements() {
            let Some(element_type) = registry.resolve(&element.type_slug) else {
                values.insert(element.id.to_string(), Value::String(String::new()));
                continue;
            };
            if !element_type.is_input() {
                continue;
            }
            let value = submission
                .values
                .get(&element.id)
                .map(serde_json::to_value)
                .transpose()?
                .unwrap_or(Value::Null);
            values.insert(element.id.to_string(), value);
        }
        rows.push(json!({
            "id": submission.id.to_string(),
            "form_id": form.id.to_string(),
            "status": submission.status,
            "completed_at": submission.completed_at,
            "values": values,
        }));
    }
    Ok(Value::Array(rows))
}

/// Write the JSON projection to `writer`, pretty-printed.
pub fn write_json<W: Write>(
    registry: &ElementTypeRegistry,
    form: &Form,
    submissions: &[Submission],
    writer: W,
) -> Result<(), ExportError> {
    let value = to_json(registry, form, submissions)?;
    serde_json::to_writer_pretty(writer, &value)?;
    Ok(())
}
