//! # Error Types
//!
//! Domain-specific error types for harvest-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  harvest-core errors (this file)                                       │
//! │  ├── CoreError     - General domain errors                             │
//! │  ├── FieldError    - One invalid form field                            │
//! │  └── FieldErrors   - Every invalid field of a draft, keyed by path     │
//! │                                                                         │
//! │  harvest-client errors (separate crate)                                │
//! │  ├── ClientError   - CRUD service failures                             │
//! │  └── LedgerError   - Validation or client failure during a user action │
//! │                                                                         │
//! │  Flow: FieldErrors → CoreError → LedgerError → Notification / form    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors never reach the network layer: they block submission
//! and are shown next to their fields, all at once.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use thiserror::Error;

use crate::validation::FieldPath;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The draft has invalid fields; nothing may be submitted.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// A field path that the crop form does not have.
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        CoreError::Validation(errors)
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Field Error
// =============================================================================

/// Why a single form field was rejected.
///
/// The message is what the form shows under the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Required text is blank.
    #[error("{}", .field.missing_message())]
    MissingField { field: FieldPath },

    /// Number is absent, unparsable or negative.
    #[error("{}", .field.range_message())]
    InvalidRange { field: FieldPath },
}

impl FieldError {
    /// The field this error belongs to.
    pub const fn field(&self) -> FieldPath {
        match self {
            FieldError::MissingField { field } | FieldError::InvalidRange { field } => *field,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Every violation found in one validation pass, keyed by field path.
///
/// ## Serialization
/// What the form receives:
/// ```json
/// {
///   "crop.name": "Crop name is required",
///   "sold_at": "Sold price is required and must be ≥ 0"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FieldPath, FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error, replacing any earlier one for the same field.
    pub fn insert(&mut self, error: FieldError) {
        self.0.insert(error.field(), error);
    }

    /// Clears the error of one field, returning it if present.
    pub fn remove(&mut self, field: FieldPath) -> Option<FieldError> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: FieldPath) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: FieldPath) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Errors in field order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.values()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        let mut errors = FieldErrors::new();
        for error in iter {
            errors.insert(error);
        }
        errors
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = (&'a FieldPath, &'a FieldError);
    type IntoIter = btree_map::Iter<'a, FieldPath, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, error)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{path}: {error}")?;
        }
        Ok(())
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (path, error) in &self.0 {
            map.serialize_entry(&path.to_string(), &error.to_string())?;
        }
        map.end()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExpenseField;

    #[test]
    fn test_field_error_messages() {
        let err = FieldError::MissingField {
            field: FieldPath::CropName,
        };
        assert_eq!(err.to_string(), "Crop name is required");

        let err = FieldError::InvalidRange {
            field: FieldPath::CropQty,
        };
        assert_eq!(err.to_string(), "Quantity is required and must be ≥ 0");

        let err = FieldError::InvalidRange {
            field: FieldPath::SoldAt,
        };
        assert_eq!(err.to_string(), "Sold price is required and must be ≥ 0");

        let err = FieldError::InvalidRange {
            field: FieldPath::Expense(ExpenseField::Labor),
        };
        assert_eq!(err.to_string(), "Required and must be ≥ 0");
    }

    #[test]
    fn test_field_errors_serialize_as_path_message_map() {
        let errors: FieldErrors = [
            FieldError::InvalidRange {
                field: FieldPath::SoldAt,
            },
            FieldError::MissingField {
                field: FieldPath::CropName,
            },
        ]
        .into_iter()
        .collect();

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["crop.name"], "Crop name is required");
        assert_eq!(value["sold_at"], "Sold price is required and must be ≥ 0");
    }

    #[test]
    fn test_display_lists_fields_in_order() {
        let errors: FieldErrors = [
            FieldError::InvalidRange {
                field: FieldPath::Expense(ExpenseField::Seeds),
            },
            FieldError::MissingField {
                field: FieldPath::CropName,
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(
            errors.to_string(),
            "crop.name: Crop name is required; expense.seeds: Required and must be ≥ 0"
        );
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::new();
        errors.insert(FieldError::MissingField {
            field: FieldPath::CropName,
        });
        let err = errors.into_result().unwrap_err();
        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::Validation(_)));
    }
}
