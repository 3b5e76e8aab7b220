//! Client-side form validation.
//!
//! Forms derive [`validator::Validate`]; [`validate_form`] runs the derived
//! rules and flattens any failures into a single [`CoreError::Validation`]
//! so that nothing is sent to the backend for malformed input.

use validator::Validate;

use crate::error::CoreError;

/// Run the derived rules on `form`.
///
/// The error message lists each failing field once, sorted by field name,
/// using the rule's custom message when one is set.
pub fn validate_form<T: Validate>(form: &T) -> Result<(), CoreError> {
    let Err(errors) = form.validate() else {
        return Ok(());
    };

    let mut lines: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid ({})", e.code),
                })
                .collect::<Vec<_>>()
                .join(", ");
            (field.to_string(), detail)
        })
        .map(|(field, detail)| format!("{field}: {detail}"))
        .collect();
    lines.sort();

    Err(CoreError::Validation(lines.join("; ")))
}

/// Validate a whitespace-insensitive required value.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field}: {field} is required")));
    }
    Ok(())
}
