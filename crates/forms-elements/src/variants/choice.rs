//! Choice-based inputs: single choice (radio group), dropdown, and
//! multiple choice (checkbox group).
//!
//! All of them reject submitted values that are not present in the element's
//! choice set, exact match and case-sensitive, regardless of required status.

use forms_model::{
    Element, FieldValue, RawValue, SettingDescriptor, SettingKind, Submission, ValidationError,
};

use crate::common::{
    check_choice_membership, check_count_bounds, required_error, shape_error,
};
use crate::element_type::{ElementType, ExportFormat};

fn validate_single(
    raw: &RawValue,
    element: &Element,
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
    check_choice_membership(element, value)?;
    Ok(FieldValue::Text(value.to_string()))
}

fn display_choice_label(element: &Element, value: &str) -> String {
    element
        .choices
        .iter()
        .find(|choice| choice.value == value)
        .map_or_else(|| value.to_string(), |choice| choice.label.clone())
}

/// Radio-group single choice.
pub struct OneChoice;

impl ElementType for OneChoice {
    fn slug(&self) -> &'static str {
        "onechoice"
    }

    fn description(&self) -> &'static str {
        "Single choice (radio group)"
    }

    fn validate(
        &self,
        raw: &RawValue,
        element: &Element,
        _submission: &Submission,
    ) -> Result<FieldValue, ValidationError> {
        validate_single(raw, element)
    }

    fn format_display(&self, value: &FieldValue, element: &Element) -> String {
        display_choice_label(element, value.main_text())
    }
}

/// Select-box single choice. Same validation as [`OneChoice`]; registered
/// under its own slug because it renders differently and the builder offers
/// it separately.
pub struct Dropdown;

impl ElementType for Dropdown {
    fn slug(&self) -> &'static str {
        "dropdown"
    }

    fn description(&self) -> &'static str {
        "Single choice (select box)"
    }

    fn validate(
        &self,
        raw: &RawValue,
        element: &Element,
        _submission: &Submission,
    ) -> Result<FieldValue, ValidationError> {
        validate_single(raw, element)
    }

    fn format_display(&self, value: &FieldValue, element: &Element) -> String {
        display_choice_label(element, value.main_text())
    }
}

/// Checkbox-group multiple choice.
pub struct MultipleChoice;

impl ElementType for MultipleChoice {
    fn slug(&self) -> &'static str {
        "multiplechoice"
    }

    fn description(&self) -> &'static str {
        "Multiple choice (checkbox group)"
    }

    fn settings(&self) -> Vec<SettingDescriptor> {
        vec![
            SettingDescriptor::new("min_choices", SettingKind::Integer, "Minimum selections"),
            SettingDescriptor::new("max_choices", SettingKind::Integer, "Maximum selections"),
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
        // A lone scalar is accepted as a single-element selection.
        let values: Vec<String> = match raw {
            RawValue::Many(values) => values
                .iter()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect(),
            RawValue::Text(value) => vec![value.trim().to_string()],
            RawValue::Fields(_) => return Err(shape_error(element)),
        };
        for value in &values {
            check_choice_membership(element, value)?;
        }
        check_count_bounds(element, values.len())?;
        Ok(FieldValue::Many(values))
    }

    fn format_display(&self, value: &FieldValue, element: &Element) -> String {
        match value {
            FieldValue::Many(values) => values
                .iter()
                .map(|value| display_choice_label(element, value))
                .collect::<Vec<_>>()
                .join(", "),
            other => display_choice_label(element, other.main_text()),
        }
    }

    fn format_export(&self, value: &FieldValue, element: &Element, format: ExportFormat) -> String {
        let separator = match format {
            ExportFormat::Csv => "; ",
            ExportFormat::Html => "<br>",
        };
        match value {
            FieldValue::Many(values) => values
                .iter()
                .map(|value| display_choice_label(element, value))
                .collect::<Vec<_>>()
                .join(separator),
            other => display_choice_label(element, other.main_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use forms_model::{ElementChoice, ElementId, ElementSettings, FormId, SettingValue,
        SubmissionId, ValidationErrorKind};

    fn submission() -> Submission {
        Submission::new(SubmissionId::new(1), FormId::new(1), Utc::now())
    }

    fn color_element(slug: &str) -> Element {
        Element::new(ElementId::new("color").unwrap(), slug, "Color").with_choices(vec![
            ElementChoice::new("red", "Red"),
            ElementChoice::new("green", "Green"),
            ElementChoice::new("blue", "Blue"),
        ])
    }

    #[test]
    fn unknown_value_is_invalid_choice_even_when_optional() {
        let element = color_element("onechoice");
        let err = OneChoice
            .validate(&RawValue::text("purple"), &element, &submission())
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidChoice);
    }

    #[test]
    fn choice_match_is_case_sensitive() {
        let element = color_element("dropdown");
        let err = Dropdown
            .validate(&RawValue::text("Red"), &element, &submission())
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidChoice);
        assert!(
            Dropdown
                .validate(&RawValue::text("red"), &element, &submission())
                .is_ok()
        );
    }

    #[test]
    fn multiple_choice_validates_every_value() {
        let element = color_element("multiplechoice");
        let err = MultipleChoice
            .validate(
                &RawValue::Many(vec!["red".into(), "purple".into()]),
                &element,
                &submission(),
            )
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidChoice);
    }

    #[test]
    fn selection_count_bounds() {
        let element = color_element("multiplechoice").with_settings(
            ElementSettings::new()
                .with("min_choices", SettingValue::Integer(2))
                .with("max_choices", SettingValue::Integer(2)),
        );
        let sub = submission();

        let err = MultipleChoice
            .validate(&RawValue::Many(vec!["red".into()]), &element, &sub)
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TooShort);

        let err = MultipleChoice
            .validate(
                &RawValue::Many(vec!["red".into(), "green".into(), "blue".into()]),
                &element,
                &sub,
            )
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TooLong);

        let value = MultipleChoice
            .validate(
                &RawValue::Many(vec!["red".into(), "blue".into()]),
                &element,
                &sub,
            )
            .unwrap();
        assert_eq!(value, FieldValue::Many(vec!["red".into(), "blue".into()]));
    }

    #[test]
    fn display_uses_choice_labels() {
        let element = color_element("multiplechoice");
        let value = FieldValue::Many(vec!["red".into(), "blue".into()]);
        assert_eq!(MultipleChoice.format_display(&value, &element), "Red, Blue");
        assert_eq!(
            MultipleChoice.format_export(&value, &element, ExportFormat::Csv),
            "Red; Blue"
        );
        assert_eq!(
            MultipleChoice.format_export(&value, &element, ExportFormat::Html),
            "Red<br>Blue"
        );
    }
}
