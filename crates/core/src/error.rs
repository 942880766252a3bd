use crate::types::DbId;
use crate::validation::FieldViolation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// An identifier that is not in the expected shape. Surfaces as a 404,
    /// the same as a well-formed id that matches nothing.
    #[error("Malformed identifier: {0}")]
    MalformedId(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Every field-level violation found on a write, not just the first.
    #[error("Validation failed: {}", join_violations(.0))]
    InvalidFields(Vec<FieldViolation>),

    /// A list query whose filter, sort or operator could not be interpreted.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Duplicate value: {0}")]
    Duplicate(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A per-user quota that blocks the write, e.g. one bootcamp per publisher.
    #[error("Limit reached: {0}")]
    LimitReached(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Join violation messages into the single string sent to clients.
pub fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_fields_display_lists_every_message() {
        let err = CoreError::InvalidFields(vec![
            FieldViolation::new("name", "Please add a name"),
            FieldViolation::new("address", "Please add an address"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Please add a name, Please add an address"
        );
    }
}
