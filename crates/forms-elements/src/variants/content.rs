//! Static content block. Collects no input and is always skip-validated.

use forms_model::{Element, FieldValue, RawValue, Submission, ValidationError};

use crate::element_type::ElementType;

pub struct StaticContent;

impl ElementType for StaticContent {
    fn slug(&self) -> &'static str {
        "content"
    }

    fn description(&self) -> &'static str {
        "Static content (no input)"
    }

    fn is_input(&self) -> bool {
        false
    }

    fn validate(
        &self,
        _raw: &RawValue,
        _element: &Element,
        _submission: &Submission,
    ) -> Result<FieldValue, ValidationError> {
        Ok(FieldValue::Empty)
    }

    fn format_display(&self, _value: &FieldValue, _element: &Element) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use forms_model::{ElementId, FormId, SubmissionId};

    #[test]
    fn always_validates_to_empty() {
        let element = Element::new(ElementId::new("intro").unwrap(), "content", "Intro")
            .required(true);
        let submission = Submission::new(SubmissionId::new(1), FormId::new(1), Utc::now());
        // Required is meaningless on non-input types; still skip-validated.
        let value = StaticContent
            .validate(&RawValue::text("ignored"), &element, &submission)
            .unwrap();
        assert_eq!(value, FieldValue::Empty);
        assert!(!StaticContent.is_input());
    }
}
