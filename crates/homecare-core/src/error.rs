//! # Error Types
//!
//! Errors raised by the core data model. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! Decoding of persisted data is lenient and does not produce errors at
//! the field level; the only error source here is form-boundary
//! validation. Storage and decoding failures belong to `homecare-store`.

use thiserror::Error;

/// A required form field was missing or blank.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or contains only whitespace.
    #[error("{collection}: required field `{field}` is missing")]
    MissingField {
        /// Collection the record belongs to.
        collection: &'static str,
        /// JSON name of the missing field.
        field: &'static str,
    },

    /// A numeric field must be non-zero (expense amounts).
    #[error("{collection}: field `{field}` must be non-zero")]
    ZeroAmount {
        /// Collection the record belongs to.
        collection: &'static str,
        /// JSON name of the offending field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_display_names_collection_and_field() {
        let err = ValidationError::MissingField {
            collection: "children",
            field: "dob",
        };
        let msg = err.to_string();
        assert!(msg.contains("children"));
        assert!(msg.contains("`dob`"));
    }
}
