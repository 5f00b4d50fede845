//! Single-line text input.

use forms_model::{
    Element, FieldValue, RawValue, SettingDescriptor, SettingKind, Submission, ValidationError,
};

use crate::common::{check_input_pattern, check_length_bounds, required_error, shape_error};
use crate::element_type::ElementType;

pub struct TextField;

impl ElementType for TextField {
    fn slug(&self) -> &'static str {
        "textfield"
    }

    fn description(&self) -> &'static str {
        "Single-line text input"
    }

    fn settings(&self) -> Vec<SettingDescriptor> {
        vec![
            SettingDescriptor::new("min_length", SettingKind::Integer, "Minimum length"),
            SettingDescriptor::new("max_length", SettingKind::Integer, "Maximum length"),
            SettingDescriptor::new("input_type", SettingKind::Text, "Input type (email/url/number)"),
            SettingDescriptor::new("pattern_message", SettingKind::Text, "Pattern failure message"),
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
        check_length_bounds(element, value.chars().count())?;
        check_input_pattern(element, value)?;
        Ok(FieldValue::Text(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use forms_model::{ElementId, ElementSettings, FormId, SettingValue, SubmissionId,
        ValidationErrorKind};

    fn submission() -> Submission {
        Submission::new(SubmissionId::new(1), FormId::new(1), Utc::now())
    }

    fn bounded_element() -> Element {
        Element::new(ElementId::new("name").unwrap(), "textfield", "Name")
            .required(true)
            .with_settings(
                ElementSettings::new()
                    .with("min_length", SettingValue::Integer(5))
                    .with("max_length", SettingValue::Integer(10)),
            )
    }

    #[test]
    fn required_empty_value_errors() {
        let err = TextField
            .validate(&RawValue::text(""), &bounded_element(), &submission())
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Required);
    }

    #[test]
    fn optional_empty_value_passes_as_empty() {
        let element = Element::new(ElementId::new("nick").unwrap(), "textfield", "Nickname");
        let value = TextField
            .validate(&RawValue::text("  "), &element, &submission())
            .unwrap();
        assert_eq!(value, FieldValue::Empty);
    }

    #[test]
    fn bounds_scenario() {
        // min_length=5, max_length=10, required=true
        let element = bounded_element();
        let sub = submission();

        let err = TextField
            .validate(&RawValue::text("hi"), &element, &sub)
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TooShort);

        let err = TextField
            .validate(&RawValue::text("hello world"), &element, &sub)
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TooLong);

        let value = TextField
            .validate(&RawValue::text("hello"), &element, &sub)
            .unwrap();
        assert_eq!(value, FieldValue::Text("hello".to_string()));
    }

    #[test]
    fn pattern_runs_after_length_checks() {
        let element = Element::new(ElementId::new("mail").unwrap(), "textfield", "Mail")
            .with_settings(
                ElementSettings::new()
                    .with("min_length", SettingValue::Integer(20))
                    .with("input_type", SettingValue::Text("email".into())),
            );
        // Fails the length check before the email pattern is consulted.
        let err = TextField
            .validate(&RawValue::text("bad"), &element, &submission())
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TooShort);
    }

    #[test]
    fn list_input_is_a_shape_error() {
        let err = TextField
            .validate(
                &RawValue::Many(vec!["a".into(), "b".into()]),
                &bounded_element(),
                &submission(),
            )
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidFormat);
    }
}
