//! # Validation Utilities
//!
//! Input validation helpers.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a string looks like an absolute http(s) URL.
pub fn validate_http_url(value: &str, field_name: &str) -> Result<(), String> {
    validate_not_empty(value, field_name)?;

    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .ok_or_else(|| format!("{} must start with http:// or https://", field_name))?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(format!("{} must include a host", field_name));
    }

    Ok(())
}
