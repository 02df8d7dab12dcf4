//! Field sanitization.
//!
//! Every inbound field is trimmed and then either HTML-escaped (the default)
//! or passed through a format-restrictive filter that strips characters
//! invalid for that kind. Sanitization never rejects — rejection is the
//! validator's job — it only normalizes what later stages will embed in HTML
//! notification bodies.

use crate::models::FieldMap;

/// How a field value should be sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeKind {
    /// Trim + HTML-escape. The default for free-text fields.
    Plain,
    /// Trim + strip characters invalid in an email address.
    Email,
    /// Trim + strip characters invalid in a URL.
    Url,
    /// Trim + strip everything but digits and sign characters.
    Integer,
}

/// Sanitize a single scalar value.
pub fn sanitize(value: &str, kind: SanitizeKind) -> String {
    let trimmed = value.trim();
    match kind {
        SanitizeKind::Plain => escape_html(trimmed),
        SanitizeKind::Email => filter_chars(trimmed, is_email_char),
        SanitizeKind::Url => filter_chars(trimmed, is_url_char),
        SanitizeKind::Integer => filter_chars(trimmed, |c| c.is_ascii_digit() || c == '+' || c == '-'),
    }
}

/// Sanitize a whole field map element-wise, preserving key order.
///
/// `kind_for` selects the sanitize kind per field name, so a form spec can
/// mark its email field while everything else defaults to `Plain`.
pub fn sanitize_map<F>(fields: &FieldMap, kind_for: F) -> FieldMap
where
    F: Fn(&str) -> SanitizeKind,
{
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), sanitize(value, kind_for(name))))
        .collect()
}

/// Escape the five HTML-special characters (`&`, `<`, `>`, `"`, `'`).
///
/// Single quotes escape to the numeric entity so the output is safe inside
/// either attribute quoting style.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn filter_chars<F>(value: &str, keep: F) -> String
where
    F: Fn(char) -> bool,
{
    value.chars().filter(|&c| keep(c)).collect()
}

fn is_email_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-=?^_`{|}~@.[]".contains(c)
}

fn is_url_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=".contains(c)
}
