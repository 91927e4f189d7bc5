//! Error types for directory operations

use thiserror::Error;
use uuid::Uuid;

use crate::EntityType;

/// Input that failed a boundary check.
///
/// Every variant names the offending field so the API layer can tell the
/// caller what to fix.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Value {value} for {field} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Could not parse {field} from {value:?}: expected {expected}")]
    Unparsable {
        field: String,
        value: String,
        expected: String,
    },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::RequiredFieldMissing { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Unparsable { field, .. } => field,
        }
    }

    pub fn out_of_range(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn unparsable(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        ValidationError::Unparsable {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// Persistence layer errors.
///
/// The `reason` strings carry driver detail for server-side logs only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Insert failed for {entity_type:?}: {reason}")]
    InsertFailed {
        entity_type: EntityType,
        reason: String,
    },

    #[error("Query {operation} failed: {reason}")]
    QueryFailed { operation: String, reason: String },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Connection unavailable: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Corrupt row for {entity_type:?}: {reason}")]
    CorruptRow {
        entity_type: EntityType,
        reason: String,
    },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Master error type for directory operations.
#[derive(Debug, Clone, Error)]
pub enum WaakyeError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{entity_type:?} not found: {id}")]
    NotFound { entity_type: EntityType, id: Uuid },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl WaakyeError {
    pub fn vendor_not_found(id: Uuid) -> Self {
        WaakyeError::NotFound {
            entity_type: EntityType::Vendor,
            id,
        }
    }
}

/// Result type alias for directory operations.
pub type WaakyeResult<T> = Result<T, WaakyeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = ValidationError::out_of_range("hygiene_rating", 7, 1, 5);
        let msg = err.to_string();
        assert!(msg.contains("hygiene_rating"));
        assert!(msg.contains('7'));
        assert!(msg.contains("[1, 5]"));
        assert_eq!(err.field(), "hygiene_rating");
    }

    #[test]
    fn test_unparsable_display() {
        let err = ValidationError::unparsable("lat", "north", "a decimal number");
        assert!(err.to_string().contains("\"north\""));
        assert_eq!(err.field(), "lat");
    }

    #[test]
    fn test_storage_error_converts_into_master_error() {
        let err: WaakyeError = StorageError::LockPoisoned.into();
        assert!(matches!(err, WaakyeError::Storage(StorageError::LockPoisoned)));
    }

    #[test]
    fn test_vendor_not_found_display() {
        let err = WaakyeError::vendor_not_found(Uuid::nil());
        let msg = err.to_string();
        assert!(msg.contains("Vendor"));
        assert!(msg.contains("00000000-0000-0000-0000-000000000000"));
    }
}
