use std::collections::HashMap;

use validator::{ValidationError, ValidationErrors};

pub fn flatten_errors(errors: &ValidationErrors) -> String {
    // Collect field keys first
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|k| k.to_string())
        .collect();

    // Ensure error fields are sorted ascending
    fields.sort();

    let field_errors = errors.field_errors();
    let messages: Vec<String> = fields
        .into_iter()
        .map(|k| {
            let Some(item) = field_errors.get(k.as_str()) else {
                return format!("{}: invalid", k);
            };
            let msgs: Vec<String> = item.iter().map(error_to_string).collect();
            format!("{}: {}", k, msgs.join(", "))
        })
        .collect();

    messages.join(", ")
}

/// First error message of each failing field, for inline display next to the input.
pub fn field_messages(errors: &ValidationErrors) -> HashMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, items)| {
            items
                .first()
                .map(|item| (field.to_string(), error_to_string(item)))
        })
        .collect()
}

fn error_to_string(error: &ValidationError) -> String {
    if let Some(message) = error.message.as_ref() {
        return message.to_string();
    }

    // Provide partial error code conversion
    match error.code.as_ref() {
        "length" => match (
            error.params.get("min"),
            error.params.get("max"),
            error.params.get("equal"),
        ) {
            (Some(min), Some(max), None) => {
                format!("must be between {} and {} characters", min, max)
            }
            (Some(min), None, None) => format!("must be at least {} characters", min),
            (None, Some(max), None) => format!("must be at most {} characters", max),
            (None, None, Some(equal)) => format!("must be {} characters", equal),
            _ => "invalid length".to_string(),
        },
        "required" => "required".to_string(),
        _ => "invalid".to_string(),
    }
}
