//! Explicit field validation for every writable entity.
//!
//! Each entity has a `validate_*` function that checks a borrowed draft of
//! the incoming fields and returns every violation it finds. Handlers call
//! these before each create and update, then turn a non-empty result into
//! [`CoreError::InvalidFields`] via [`ensure_valid`].

pub mod entities;
pub mod rules;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub use entities::*;

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Whether a draft describes a new record or a partial update.
///
/// On create, required fields must be present. On update, an absent field
/// means "leave unchanged" and only supplied values are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Convert a list of violations into a `Result`.
pub fn ensure_valid(violations: Vec<FieldViolation>) -> Result<(), CoreError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(CoreError::InvalidFields(violations))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn empty_violation_list_is_ok() {
        assert!(ensure_valid(Vec::new()).is_ok());
    }

    #[test]
    fn violations_become_invalid_fields() {
        let result = ensure_valid(vec![FieldViolation::new("title", "Please add a title")]);
        assert_matches!(result, Err(CoreError::InvalidFields(v)) if v.len() == 1);
    }
}
