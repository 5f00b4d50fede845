//! The element type contract.
//!
//! Every field kind implements [`ElementType`]: validation of raw input into
//! a normalized value, projections for display and export, and a description
//! of the settings it understands. Implementations are pure functions of the
//! input and the element's settings; they hold no per-submission state.

use forms_model::{Element, FieldValue, RawValue, SettingDescriptor, Submission, ValidationError};

/// Target format for export projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Flat cell text for CSV-style tabular exports.
    Csv,
    /// Markup-safe text for HTML tables (multi-values joined with `<br>`).
    Html,
}

/// Polymorphic behavior of one field kind.
///
/// # Implementing an element type
///
/// 1. Implement this trait for a unit struct.
/// 2. Register it in [`crate::registry::default_registry`] (or a custom
///    registry) under its slug.
///
/// Validation order is fixed across all input variants: the required check
/// runs first; an empty optional value short-circuits to
/// [`FieldValue::Empty`]; minimum bounds are checked before maximum bounds;
/// type-specific pattern checks run last.
pub trait ElementType: Send + Sync {
    /// Stable slug this type is registered under (e.g. `"textfield"`).
    fn slug(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str {
        "Form element"
    }

    /// False for static content that collects no input. Non-input types are
    /// always skip-validated.
    fn is_input(&self) -> bool {
        true
    }

    /// Settings keys this type understands.
    fn settings(&self) -> Vec<SettingDescriptor> {
        Vec::new()
    }

    /// Validate raw input into a normalized value, or a structured error.
    ///
    /// Errors are values: the caller aggregates failures across a whole
    /// container before reporting back to the visitor.
    fn validate(
        &self,
        raw: &RawValue,
        element: &Element,
        submission: &Submission,
    ) -> Result<FieldValue, ValidationError>;

    /// Project a stored value for read paths (entry views, notifications).
    fn format_display(&self, value: &FieldValue, element: &Element) -> String {
        let _ = element;
        value.main_text().to_string()
    }

    /// Project a stored value for an export target. File writing is the
    /// exporter's concern; this only shapes the cell text.
    fn format_export(&self, value: &FieldValue, element: &Element, format: ExportFormat) -> String {
        let _ = format;
        self.format_display(value, element)
    }
}
