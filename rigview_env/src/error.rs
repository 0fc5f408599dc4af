//! Error types for the RigView environment layer.

use thiserror::Error;

/// Errors that can occur while materializing or querying an environment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    /// The configuration source could not be read or parsed
    #[error("Store unavailable ({source_name}): {reason}")]
    StoreUnavailable { source_name: String, reason: String },

    /// Query addressed a category that was not in the store at construction
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Query addressed an entity id absent from the registry
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// Two categories declare the same entity id
    #[error("Duplicate entity id {id} in categories {first} and {second}")]
    DuplicateEntityId {
        id: String,
        first: String,
        second: String,
    },

    /// A reference inside a field value points at no known entity
    #[error("Dangling reference: {0}")]
    DanglingReference(String),

    /// The entity has no accessor with this name
    #[error("Entity {entity} has no field {field}")]
    UnknownField { entity: String, field: String },

    /// The accessor exists but the store no longer holds a value for it
    #[error("Field {category}/{id}/{field} is no longer present in the store")]
    FieldVanished {
        category: String,
        id: String,
        field: String,
    },

    /// A field expected to hold entity references holds something else
    #[error("Field {field} of {entity} is not a reference list (found {found})")]
    NotAReferenceList {
        entity: String,
        field: String,
        found: &'static str,
    },
}

impl EnvError {
    /// Creates a store-unavailable error.
    pub fn unavailable(source_name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an unknown-entity error.
    pub fn unknown_entity(id: impl Into<String>) -> Self {
        Self::UnknownEntity(id.into())
    }

    /// Creates a dangling-reference error.
    pub fn dangling(id: impl Into<String>) -> Self {
        Self::DanglingReference(id.into())
    }

    /// Returns true for errors a caller can treat as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownCategory(_) | Self::UnknownEntity(_) | Self::DanglingReference(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(EnvError::UnknownCategory("beams".into()).is_not_found());
        assert!(EnvError::unknown_entity("BEAM_ID_9").is_not_found());
        assert!(EnvError::dangling("BEAM_ID_9").is_not_found());
        assert!(!EnvError::unavailable("mem", "boom").is_not_found());
    }

    #[test]
    fn test_duplicate_message_names_both_categories() {
        let err = EnvError::DuplicateEntityId {
            id: "X".into(),
            first: "antennas".into(),
            second: "beams".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("antennas"));
        assert!(msg.contains("beams"));
    }
}
