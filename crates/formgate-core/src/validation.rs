//! Field validation.
//!
//! Required-field checking accumulates every missing field into one error
//! list instead of stopping at the first, so the response can name all of
//! them at once. Email validation is a shape check, not a deliverability
//! check.

use crate::models::FieldMap;

/// Check every required field and return the accumulated errors.
///
/// A field counts as missing when it is absent or empty after trimming.
/// An empty return value means the data is valid.
pub fn validate_required(required: &[&str], data: &FieldMap) -> Vec<String> {
    let mut errors = Vec::new();
    for &field in required {
        if data.get_or_empty(field).trim().is_empty() {
            errors.push(format!("{} is required.", humanize_field_name(field)));
        }
    }
    errors
}

/// `job_position` → `Job position`.
pub fn humanize_field_name(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

/// Standard email-shape check: exactly one `@` with a non-empty local part
/// and a dotted domain, no whitespace anywhere.
pub fn validate_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.len() < 3 {
        return false;
    }
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    // Domain needs an interior dot: not leading, not trailing.
    let Some(dot) = domain.rfind('.') else {
        return false;
    };
    if dot == 0 || dot == domain.len() - 1 {
        return false;
    }
    !domain.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(entries: &[(&str, &str)]) -> FieldMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_field_yields_exactly_one_humanized_error() {
        let data = fields(&[("name", ""), ("email", "x@y.com")]);
        let errors = validate_required(&["name", "email"], &data);
        assert_eq!(errors, vec!["Name is required."]);
    }

    #[test]
    fn all_missing_fields_are_accumulated() {
        let data = fields(&[("first_name", ""), ("company", "  ")]);
        let errors = validate_required(&["first_name", "last_name", "company"], &data);
        assert_eq!(
            errors,
            vec![
                "First name is required.",
                "Last name is required.",
                "Company is required.",
            ]
        );
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let data = fields(&[("message", "   ")]);
        assert_eq!(validate_required(&["message"], &data).len(), 1);
    }

    #[test]
    fn humanization_replaces_underscores_and_capitalizes() {
        assert_eq!(humanize_field_name("job_position"), "Job position");
        assert_eq!(humanize_field_name("email"), "Email");
    }

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(validate_email("a@b.co"));
        assert!(validate_email("first.last+tag@sub.example.com"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!validate_email(""));
        assert!(!validate_email("plainaddress"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("a@.com"));
        assert!(!validate_email("a@example."));
        assert!(!validate_email("a@exa mple.com"));
        assert!(!validate_email("a@b@c.com"));
        assert!(!validate_email("a@example..com"));
    }
}
