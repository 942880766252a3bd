//! Primitive field checks shared by the entity validators.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldViolation, WriteMode};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("valid regex")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$",
    )
    .expect("valid regex")
});

/// Check whether `email` looks like a deliverable address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check whether `url` is an absolute http(s) URL.
pub fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

/// Required-field check for a text value.
///
/// Returns `Some(value)` when there is something further to check, so callers
/// can chain length/format rules without re-matching on presence.
pub fn required_text<'a>(
    out: &mut Vec<FieldViolation>,
    field: &str,
    value: Option<&'a str>,
    mode: WriteMode,
    message: &str,
) -> Option<&'a str> {
    match value {
        Some(v) if v.trim().is_empty() => {
            out.push(FieldViolation::new(field, message));
            None
        }
        Some(v) => Some(v),
        None => {
            if mode == WriteMode::Create {
                out.push(FieldViolation::new(field, message));
            }
            None
        }
    }
}

/// Required-field check for a non-text value.
pub fn required<T: Copy>(
    out: &mut Vec<FieldViolation>,
    field: &str,
    value: Option<T>,
    mode: WriteMode,
    message: &str,
) -> Option<T> {
    if value.is_none() && mode == WriteMode::Create {
        out.push(FieldViolation::new(field, message));
    }
    value
}

/// Maximum character count (not bytes) for a text value.
pub fn max_chars(out: &mut Vec<FieldViolation>, field: &str, value: &str, max: usize, message: &str) {
    if value.trim().chars().count() > max {
        out.push(FieldViolation::new(field, message));
    }
}

/// Membership check against a fixed set of allowed values.
pub fn one_of(out: &mut Vec<FieldViolation>, field: &str, value: &str, allowed: &[&str]) {
    if !allowed.contains(&value) {
        out.push(FieldViolation::new(
            field,
            format!("'{value}' is not a valid {field}. Valid values: {}", allowed.join(", ")),
        ));
    }
}
