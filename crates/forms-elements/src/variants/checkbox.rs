//! Single opt-in checkbox (consent box, terms acceptance).

use forms_model::{Element, FieldValue, RawValue, Submission, ValidationError};

use crate::common::required_error;
use crate::element_type::{ElementType, ExportFormat};

/// Values the client may send for a ticked box.
const TRUTHY: &[&str] = &["yes", "on", "1", "true"];

pub struct Checkbox;

impl ElementType for Checkbox {
    fn slug(&self) -> &'static str {
        "checkbox"
    }

    fn description(&self) -> &'static str {
        "Single opt-in checkbox"
    }

    fn validate(
        &self,
        raw: &RawValue,
        element: &Element,
        _submission: &Submission,
    ) -> Result<FieldValue, ValidationError> {
        let checked = match raw {
            RawValue::Text(value) => TRUTHY.contains(&value.trim().to_lowercase().as_str()),
            _ => false,
        };
        if checked {
            // Normalized marker value, independent of what the client sent.
            return Ok(FieldValue::Text("yes".to_string()));
        }
        if element.required {
            return Err(required_error(element));
        }
        Ok(FieldValue::Empty)
    }

    fn format_display(&self, value: &FieldValue, _element: &Element) -> String {
        if value.main_text() == "yes" { "Yes" } else { "No" }.to_string()
    }

    fn format_export(&self, value: &FieldValue, element: &Element, _format: ExportFormat) -> String {
        self.format_display(value, element)
    }
}
