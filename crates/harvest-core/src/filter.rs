//! # Filter Engine
//!
//! Narrows a record list for display using the criteria typed into the
//! filter bar.
//!
//! ## Predicates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Criterion     Compared against        Match                            │
//! │  ───────────   ─────────────────────   ──────────────────────────────   │
//! │  cropName      crop.name               case-insensitive substring       │
//! │  minRevenue    revenue(record)         revenue ≥ bound                  │
//! │  maxRevenue    revenue(record)         revenue ≤ bound                  │
//! │  minQuantity   crop.qty                qty ≥ bound                      │
//! │  maxQuantity   crop.qty                qty ≤ bound                      │
//! │                                                                         │
//! │  All combined with AND. Blank or non-numeric criterion = inactive.      │
//! │  Output keeps input order (stable, no re-sort).                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use harvest_core::filter::{filter, FilterCriteria};
//! use harvest_core::money::Rupiah;
//! use harvest_core::types::{CropRecord, ExpenseBreakdown};
//!
//! let records = vec![
//!     CropRecord::new("Padi", 100, Rupiah::from_amount(5_000), ExpenseBreakdown::default()),
//!     CropRecord::new("Jagung", 50, Rupiah::from_amount(3_000), ExpenseBreakdown::default()),
//! ];
//!
//! let criteria = FilterCriteria::default().with_crop_name("padi");
//! let visible = filter(&records, &criteria);
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].crop.name, "Padi");
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::coerce;
use crate::types::CropRecord;

/// Raw filter bar input.
///
/// Values are kept as typed; a bound is only parsed when a record is
/// matched, so half-typed input like `"-"` simply leaves it inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub crop_name: String,
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub min_revenue: String,
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub max_revenue: String,
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub min_quantity: String,
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub max_quantity: String,
}

impl FilterCriteria {
    pub fn with_crop_name(mut self, value: impl Into<String>) -> Self {
        self.crop_name = value.into();
        self
    }

    pub fn with_min_revenue(mut self, value: impl Into<String>) -> Self {
        self.min_revenue = value.into();
        self
    }

    pub fn with_max_revenue(mut self, value: impl Into<String>) -> Self {
        self.max_revenue = value.into();
        self
    }

    pub fn with_min_quantity(mut self, value: impl Into<String>) -> Self {
        self.min_quantity = value.into();
        self
    }

    pub fn with_max_quantity(mut self, value: impl Into<String>) -> Self {
        self.max_quantity = value.into();
        self
    }

    /// True when any criterion holds non-blank text.
    pub fn is_active(&self) -> bool {
        [
            &self.crop_name,
            &self.min_revenue,
            &self.max_revenue,
            &self.min_quantity,
            &self.max_quantity,
        ]
        .iter()
        .any(|value| !value.trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = FilterCriteria::default();
    }

    /// Whether one record passes every active criterion.
    pub fn matches(&self, record: &CropRecord) -> bool {
        let needle = self.crop_name.trim().to_lowercase();
        if !needle.is_empty() && !record.crop.name.to_lowercase().contains(&needle) {
            return false;
        }

        let revenue = record.revenue().amount() as f64;
        let qty = record.crop.qty as f64;

        within(revenue, &self.min_revenue, &self.max_revenue)
            && within(qty, &self.min_quantity, &self.max_quantity)
    }
}

/// Inclusive range check; an unparsable bound does not constrain.
fn within(value: f64, min: &str, max: &str) -> bool {
    let above_min = coerce::parse_finite(min).map_or(true, |bound| value >= bound);
    let below_max = coerce::parse_finite(max).map_or(true, |bound| value <= bound);
    above_min && below_max
}

/// Returns the records passing `criteria`, in their original order.
pub fn filter<'a>(records: &'a [CropRecord], criteria: &FilterCriteria) -> Vec<&'a CropRecord> {
    records.iter().filter(|record| criteria.matches(record)).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
