//! Shared validation helpers used by the built-in element types.

use std::sync::OnceLock;

use regex::Regex;

use forms_model::{Element, ValidationError, ValidationErrorKind};

pub(crate) fn required_error(element: &Element) -> ValidationError {
    ValidationError::new(
        element.id.clone(),
        ValidationErrorKind::Required,
        "This field is required.",
    )
}

pub(crate) fn shape_error(element: &Element) -> ValidationError {
    ValidationError::new(
        element.id.clone(),
        ValidationErrorKind::InvalidFormat,
        "The submitted value has an unexpected shape.",
    )
}

/// Check character-length bounds. The minimum is checked before the maximum,
/// independent of which is tighter; absent settings are unconstrained.
pub(crate) fn check_length_bounds(
    element: &Element,
    length: usize,
) -> Result<(), ValidationError> {
    if let Some(min) = element.settings.integer("min_length")
        && (length as i64) < min
    {
        return Err(ValidationError::new(
            element.id.clone(),
            ValidationErrorKind::TooShort,
            format!("Value must be at least {min} characters long."),
        ));
    }
    if let Some(max) = element.settings.integer("max_length")
        && (length as i64) > max
    {
        return Err(ValidationError::new(
            element.id.clone(),
            ValidationErrorKind::TooLong,
            format!("Value must not exceed {max} characters."),
        ));
    }
    Ok(())
}

/// Check selection-count bounds for multi-choice elements.
pub(crate) fn check_count_bounds(element: &Element, count: usize) -> Result<(), ValidationError> {
    if let Some(min) = element.settings.integer("min_choices")
        && (count as i64) < min
    {
        return Err(ValidationError::new(
            element.id.clone(),
            ValidationErrorKind::TooShort,
            format!("Select at least {min} options."),
        ));
    }
    if let Some(max) = element.settings.integer("max_choices")
        && (count as i64) > max
    {
        return Err(ValidationError::new(
            element.id.clone(),
            ValidationErrorKind::TooLong,
            format!("Select no more than {max} options."),
        ));
    }
    Ok(())
}

/// Reject values not present in the element's choice set (exact match,
/// case-sensitive). Client-supplied option values are never trusted.
pub(crate) fn check_choice_membership(
    element: &Element,
    value: &str,
) -> Result<(), ValidationError> {
    if element.has_choice(value) {
        return Ok(());
    }
    Err(ValidationError::new(
        element.id.clone(),
        ValidationErrorKind::InvalidChoice,
        "Please select one of the available options.",
    ))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url pattern compiles"))
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("number pattern compiles"))
}

/// Run the input-type pattern configured on the element, if any. Runs only
/// after required and length checks pass. The failure message is the
/// element's `pattern_message` setting when present, else a generic one.
pub(crate) fn check_input_pattern(element: &Element, value: &str) -> Result<(), ValidationError> {
    let Some(input_type) = element.settings.text("input_type") else {
        return Ok(());
    };
    let valid = match input_type {
        "email" => email_pattern().is_match(value),
        "url" => url_pattern().is_match(value),
        "number" => number_pattern().is_match(value),
        // Unknown input types are not a visitor problem; treat as unconstrained.
        _ => true,
    };
    if valid {
        return Ok(());
    }
    let message = element
        .settings
        .text("pattern_message")
        .unwrap_or("This value is invalid.")
        .to_string();
    Err(ValidationError::new(
        element.id.clone(),
        ValidationErrorKind::InvalidFormat,
        message,
    ))
}
