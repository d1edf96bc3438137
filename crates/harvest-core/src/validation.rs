//! # Validation Module
//!
//! Gates a crop draft before it may be sent to the store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Rules                                   │
//! │                                                                         │
//! │  Field                 Rule                         Error               │
//! │  ───────────────────   ──────────────────────────   ─────────────────   │
//! │  crop.name             blank after trim             MissingField        │
//! │  crop.qty              blank, not a number, < 0     InvalidRange        │
//! │  sold_at               blank, not a number, < 0     InvalidRange        │
//! │  expense.<scalar> ×7   blank, not a number, < 0     InvalidRange        │
//! │                                                                         │
//! │  fertilizers / pesticides: NOT validated. Incomplete rows are dropped  │
//! │  when the payload is prepared (see `draft::CropDraft::prepare`).        │
//! │                                                                         │
//! │  One pass, no short-circuit: every violation is reported together.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use harvest_core::draft::CropDraft;
//! use harvest_core::validation::{validate, FieldPath};
//!
//! let errors = validate(&CropDraft::default()).unwrap_err();
//! assert!(errors.contains(FieldPath::CropName));
//! assert!(errors.contains(FieldPath::SoldAt));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::coerce;
use crate::draft::CropDraft;
use crate::error::{CoreError, FieldError, FieldErrors};
use crate::types::ExpenseField;

/// Result type for single-field validators.
pub type ValidationResult<T> = Result<T, FieldError>;

// =============================================================================
// Field Paths
// =============================================================================

/// A validated field of the crop form.
///
/// Displays as the dotted key the form uses: `crop.name`, `crop.qty`,
/// `sold_at`, `expense.water_usage`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    CropName,
    CropQty,
    SoldAt,
    Expense(ExpenseField),
}

impl FieldPath {
    /// Every validated field, in form order.
    pub fn all() -> impl Iterator<Item = FieldPath> {
        [FieldPath::CropName, FieldPath::CropQty, FieldPath::SoldAt]
            .into_iter()
            .chain(ExpenseField::ALL.into_iter().map(FieldPath::Expense))
    }

    pub(crate) const fn missing_message(&self) -> &'static str {
        match self {
            FieldPath::CropName => "Crop name is required",
            FieldPath::CropQty => "Quantity is required",
            FieldPath::SoldAt => "Sold price is required",
            FieldPath::Expense(_) => "Required",
        }
    }

    pub(crate) const fn range_message(&self) -> &'static str {
        match self {
            FieldPath::CropName => "Crop name is invalid",
            FieldPath::CropQty => "Quantity is required and must be ≥ 0",
            FieldPath::SoldAt => "Sold price is required and must be ≥ 0",
            FieldPath::Expense(_) => "Required and must be ≥ 0",
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::CropName => f.write_str("crop.name"),
            FieldPath::CropQty => f.write_str("crop.qty"),
            FieldPath::SoldAt => f.write_str("sold_at"),
            FieldPath::Expense(field) => write!(f, "expense.{}", field.key()),
        }
    }
}

impl FromStr for FieldPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crop.name" => Ok(FieldPath::CropName),
            "crop.qty" => Ok(FieldPath::CropQty),
            "sold_at" => Ok(FieldPath::SoldAt),
            other => other
                .strip_prefix("expense.")
                .and_then(ExpenseField::from_key)
                .map(FieldPath::Expense)
                .ok_or_else(|| CoreError::UnknownField(other.to_string())),
        }
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Single-Field Validators
// =============================================================================

/// Validates the crop name.
///
/// ```rust
/// use harvest_core::validation::validate_crop_name;
///
/// assert!(validate_crop_name("Padi").is_ok());
/// assert!(validate_crop_name("   ").is_err());
/// ```
pub fn validate_crop_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(FieldError::MissingField {
            field: FieldPath::CropName,
        });
    }
    Ok(())
}

/// Validates a required non-negative number typed into `field`.
///
/// Blank, unparsable and negative input are all `InvalidRange`.
pub fn validate_non_negative(field: FieldPath, raw: &str) -> ValidationResult<f64> {
    match coerce::parse_finite(raw) {
        Some(value) if value >= 0.0 => Ok(value),
        _ => Err(FieldError::InvalidRange { field }),
    }
}

/// Validates the harvested quantity: a non-negative whole number.
///
/// ```rust
/// use harvest_core::validation::validate_quantity;
///
/// assert!(validate_quantity("3").is_ok());
/// assert!(validate_quantity("2.5").is_err());
/// ```
pub fn validate_quantity(raw: &str) -> ValidationResult<f64> {
    let value = validate_non_negative(FieldPath::CropQty, raw)?;
    if value.fract() != 0.0 {
        return Err(FieldError::InvalidRange {
            field: FieldPath::CropQty,
        });
    }
    Ok(value)
}

/// Validates the per-unit sale price.
pub fn validate_sold_at(raw: &str) -> ValidationResult<f64> {
    validate_non_negative(FieldPath::SoldAt, raw)
}

/// Validates one scalar expense field.
pub fn validate_expense_amount(field: ExpenseField, raw: &str) -> ValidationResult<f64> {
    validate_non_negative(FieldPath::Expense(field), raw)
}

// =============================================================================
// Draft Validation
// =============================================================================

/// Validates one field of a draft.
pub fn validate_field(draft: &CropDraft, field: FieldPath) -> ValidationResult<()> {
    match field {
        FieldPath::CropName => validate_crop_name(&draft.crop.name),
        FieldPath::CropQty => validate_quantity(&draft.crop.qty).map(|_| ()),
        FieldPath::SoldAt => validate_sold_at(&draft.sold_at).map(|_| ()),
        FieldPath::Expense(expense) => {
            validate_expense_amount(expense, draft.expense.scalar(expense)).map(|_| ())
        }
    }
}

/// Validates a whole draft, accumulating every violation.
///
/// Must run again at submission time even if per-keystroke checks already
/// cleared some errors: later edits can reintroduce invalid values.
pub fn validate(draft: &CropDraft) -> Result<(), FieldErrors> {
    FieldPath::all()
        .filter_map(|field| validate_field(draft, field).err())
        .collect::<FieldErrors>()
        .into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================
