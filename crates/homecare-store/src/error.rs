//! # Storage Error Types
//!
//! Structured errors for the persistence and repository layers. Backend
//! I/O failures are never swallowed: they surface as [`StorageError`] so
//! the caller can tell the user that a change was not saved.

use homecare_core::ValidationError;
use thiserror::Error;

/// Errors from a key-value backend or from encoding the document.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The storage key cannot be used by this backend.
    #[error("invalid storage key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Reading or writing the backend failed.
    #[error("storage I/O error for key {key:?}: {source}")]
    Io {
        /// The key being accessed.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document could not be encoded as JSON.
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors from importing a user-supplied document.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file is not valid JSON.
    #[error("invalid JSON file: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The file is JSON, but not an object.
    #[error("invalid JSON file: expected an object at the top level, found {found}")]
    NotAnObject {
        /// JSON type found instead.
        found: &'static str,
    },

    /// Writing the imported document failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from repository mutations.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Persisting the mutated document failed; the in-memory state was
    /// rolled back.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A record failed form-boundary validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A record addressed by collection name is not a JSON object.
    #[error("record for collection {collection:?} must be a JSON object")]
    NotAnObject {
        /// The addressed collection.
        collection: String,
    },

    /// The name addresses a part of the document that is not a
    /// collection (`finance`, `meta`), or is empty.
    #[error("{name:?} is not a collection name")]
    ReservedName {
        /// The rejected name.
        name: String,
    },

    /// A record addressed by collection name does not fit the
    /// collection's schema.
    #[error("record does not fit collection {collection:?}: {source}")]
    Decode {
        /// The addressed collection.
        collection: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_key() {
        let err = StorageError::Io {
            key: "homecare_state_v1".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        let msg = err.to_string();
        assert!(msg.contains("homecare_state_v1"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn not_an_object_names_the_found_type() {
        let err = ImportError::NotAnObject { found: "array" };
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn validation_is_transparent() {
        let err = RepositoryError::from(ValidationError::MissingField {
            collection: "staff",
            field: "role",
        });
        assert_eq!(err.to_string(), "staff: required field `role` is missing");
    }

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&serde_json::json!([])), "array");
        assert_eq!(json_type_name(&serde_json::json!("x")), "string");
        assert_eq!(json_type_name(&serde_json::json!(null)), "null");
    }
}
