//! Numeric range input (slider).

use forms_model::{
    Element, FieldValue, RawValue, SettingDescriptor, SettingKind, Submission, ValidationError,
    ValidationErrorKind,
};

use crate::common::{required_error, shape_error};
use crate::element_type::ElementType;

/// Tolerance for step alignment on parsed floating-point input.
const STEP_EPSILON: f64 = 1e-9;

pub struct NumericRange;

impl ElementType for NumericRange {
    fn slug(&self) -> &'static str {
        "range"
    }

    fn description(&self) -> &'static str {
        "Numeric range (slider)"
    }

    fn settings(&self) -> Vec<SettingDescriptor> {
        vec![
            SettingDescriptor::new("min", SettingKind::Number, "Minimum value"),
            SettingDescriptor::new("max", SettingKind::Number, "Maximum value"),
            SettingDescriptor::new("step", SettingKind::Number, "Step size"),
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
        let value = value.trim();
        let Ok(number) = value.parse::<f64>() else {
            return Err(ValidationError::new(
                element.id.clone(),
                ValidationErrorKind::InvalidFormat,
                "Enter a number.",
            ));
        };

        let min = element.settings.number("min");
        let max = element.settings.number("max");
        if let Some(min) = min
            && number < min
        {
            return Err(ValidationError::new(
                element.id.clone(),
                ValidationErrorKind::TooShort,
                format!("Value must be at least {min}."),
            ));
        }
        if let Some(max) = max
            && number > max
        {
            return Err(ValidationError::new(
                element.id.clone(),
                ValidationErrorKind::TooLong,
                format!("Value must not exceed {max}."),
            ));
        }
        if let Some(step) = element.settings.number("step")
            && step > 0.0
        {
            // Steps count from the minimum when one is configured.
            let base = min.unwrap_or(0.0);
            let offset = (number - base) / step;
            if (offset - offset.round()).abs() > STEP_EPSILON {
                return Err(ValidationError::new(
                    element.id.clone(),
                    ValidationErrorKind::InvalidFormat,
                    format!("Value must be a multiple of {step}."),
                ));
            }
        }
        Ok(FieldValue::Text(value.to_string()))
    }
}
