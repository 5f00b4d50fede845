//! Tabular CSV projection.
//!
//! One row per submission; lead columns identify the submission, then one
//! column per exportable element, headed by its label. Cell text is shaped by
//! each element type's `format_export`; where to put the bytes is the
//! caller's concern.

use std::io::Write;

use forms_elements::{ElementTypeRegistry, ExportFormat};
use forms_model::{Element, Form, Submission};

use crate::error::ExportError;

/// Timestamp format of the `Date` lead column.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Exporter<'a> {
    registry: &'a ElementTypeRegistry,
}

impl<'a> Exporter<'a> {
    pub fn new(registry: &'a ElementTypeRegistry) -> Self {
        Self { registry }
    }

    /// Elements that get a column: inputs, plus elements whose type no longer
    /// resolves (those keep their column and export empty cells, so a stale
    /// form definition does not silently drop recorded data).
    fn columns(&self, form: &'a Form) -> Vec<&'a Element> {
        form.elements()
            .filter(|element| {
                self.registry
                    .resolve(&element.type_slug)
                    .is_none_or(|element_type| element_type.is_input())
            })
            .collect()
    }

    fn cell(&self, element: &Element, submission: &Submission) -> String {
        let Some(element_type) = self.registry.resolve(&element.type_slug) else {
            return String::new();
        };
        submission
            .values
            .get(&element.id)
            .map(|value| element_type.format_export(value, element, ExportFormat::Csv))
            .unwrap_or_default()
    }

    /// Write one CSV table for `submissions` of `form`.
    pub fn write_csv<W: Write>(
        &self,
        form: &Form,
        submissions: &[Submission],
        writer: W,
    ) -> Result<(), ExportError> {
        let columns = self.columns(form);
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec!["Submission".to_string(), "Date".to_string()];
        header.extend(columns.iter().map(|element| element.label.clone()));
        csv.write_record(&header)?;

        for submission in submissions {
            let date = submission
                .completed_at
                .unwrap_or(submission.created_at)
                .format(DATE_FORMAT)
                .to_string();
            let mut record = vec![submission.id.to_string(), date];
            record.extend(columns.iter().map(|element| self.cell(element, submission)));
            csv.write_record(&record)?;
        }
        csv.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Render the CSV table into a string.
    pub fn csv_string(
        &self,
        form: &Form,
        submissions: &[Submission],
    ) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        self.write_csv(form, submissions, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
