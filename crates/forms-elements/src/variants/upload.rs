//! File upload element.
//!
//! The value is a field-keyed map: the `_main` facet carries the stored file
//! reference, side-channel facets carry upload metadata (`name`, `size`,
//! `type`). The storage backend that produced the reference is an external
//! collaborator; validation here only inspects the metadata facets.

use std::collections::BTreeMap;

use forms_model::{
    Element, FieldValue, MAIN_FACET, RawValue, SettingDescriptor, SettingKind, Submission,
    ValidationError, ValidationErrorKind,
};

use crate::common::{required_error, shape_error};
use crate::element_type::{ElementType, ExportFormat};

pub struct FileUpload;

impl FileUpload {
    fn check_extension(
        element: &Element,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), ValidationError> {
        let Some(allowed) = element.settings.text("allowed_extensions") else {
            return Ok(());
        };
        let name = fields.get("name").map_or("", String::as_str);
        let extension = name.rsplit_once('.').map_or("", |(_, ext)| ext);
        let permitted = allowed
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate.eq_ignore_ascii_case(extension));
        if permitted {
            return Ok(());
        }
        Err(ValidationError::new(
            element.id.clone(),
            ValidationErrorKind::InvalidFormat,
            format!("Files of this type are not allowed. Allowed: {allowed}."),
        ))
    }

    fn check_size(
        element: &Element,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), ValidationError> {
        let Some(max_size) = element.settings.integer("max_size") else {
            return Ok(());
        };
        // A missing or malformed size facet cannot be trusted to be small.
        let size = fields
            .get("size")
            .and_then(|raw| raw.trim().parse::<i64>().ok());
        match size {
            Some(size) if size <= max_size => Ok(()),
            _ => Err(ValidationError::new(
                element.id.clone(),
                ValidationErrorKind::InvalidFormat,
                format!("The file exceeds the maximum size of {max_size} bytes."),
            )),
        }
    }
}

impl ElementType for FileUpload {
    fn slug(&self) -> &'static str {
        "upload"
    }

    fn description(&self) -> &'static str {
        "File upload"
    }

    fn settings(&self) -> Vec<SettingDescriptor> {
        vec![
            SettingDescriptor::new(
                "allowed_extensions",
                SettingKind::Text,
                "Comma-separated allowed file extensions",
            ),
            SettingDescriptor::new("max_size", SettingKind::Integer, "Maximum size in bytes"),
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
        let RawValue::Fields(fields) = raw else {
            return Err(shape_error(element));
        };
        Self::check_extension(element, fields)?;
        Self::check_size(element, fields)?;
        Ok(FieldValue::Fields(fields.clone()))
    }

    fn format_display(&self, value: &FieldValue, _element: &Element) -> String {
        // Show the original file name when known, else the stored reference.
        match value {
            FieldValue::Fields(fields) => fields
                .get("name")
                .or_else(|| fields.get(MAIN_FACET))
                .cloned()
                .unwrap_or_default(),
            other => other.main_text().to_string(),
        }
    }

    fn format_export(&self, value: &FieldValue, element: &Element, _format: ExportFormat) -> String {
        self.format_display(value, element)
    }
}
