//! Multi-line text input.

use forms_model::{
    Element, FieldValue, RawValue, SettingDescriptor, SettingKind, Submission, ValidationError,
};

use crate::common::{check_length_bounds, required_error, shape_error};
use crate::element_type::ElementType;

pub struct TextArea;

impl ElementType for TextArea {
    fn slug(&self) -> &'static str {
        "textarea"
    }

    fn description(&self) -> &'static str {
        "Multi-line text input"
    }

    fn settings(&self) -> Vec<SettingDescriptor> {
        vec![
            SettingDescriptor::new("min_length", SettingKind::Integer, "Minimum length"),
            SettingDescriptor::new("max_length", SettingKind::Integer, "Maximum length"),
        ]
    }

    fn validate(
        &self,
        raw: &RawValue,
        element: &Element,
        _submission: &Submission,
    ) -> Result<FieldValue, ValidationError> {
        if raw.is_empty() {
            if element.required {
                return Err(required_error(element));
            }
            return Ok(FieldValue::Empty);
        }
        let RawValue::Text(value) = raw else {
            return Err(shape_error(element));
        };
        // Interior newlines are content; only outer whitespace is trimmed.
        let value = value.trim();
        check_length_bounds(element, value.chars().count())?;
        Ok(FieldValue::Text(value.to_string()))
    }
}
