//! # Money Module
//!
//! Provides the `Rupiah` type for every monetary value in the engine.
//!
//! ## Why Integer Rupiah?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Rupiah has no fractional subunit in practice, so every price,          │
//! │  expense and derived metric lives in whole rupiah (i64).                │
//! │                                                                         │
//! │  Arithmetic SATURATES instead of overflowing: derived metrics must      │
//! │  always produce an answer, even for absurd inputs.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use harvest_core::money::Rupiah;
//!
//! let price = Rupiah::from_amount(5_000);
//! let revenue = price.multiply_quantity(100);
//! assert_eq!(revenue.amount(), 500_000);
//! assert_eq!(revenue.to_string(), "Rp 500.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Rupiah Type
// =============================================================================

/// A monetary value in whole Indonesian Rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: profit can be negative (a loss)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as a plain JSON number**: matches the crop documents
///
/// ## Where Rupiah is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CropRecord.sold_at ──► × crop.qty ──► revenue ───────┐                 │
/// │                                                        ├──► profit      │
/// │  ExpenseBreakdown ─────► total_expense ───────────────┘                 │
/// │                                                                         │
/// │  Displayed as "Rp 1.234.567" in the table and CLI                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Rupiah(#[ts(type = "number")] i64);

impl Rupiah {
    /// Creates a value from whole rupiah.
    #[inline]
    pub const fn from_amount(amount: i64) -> Self {
        Rupiah(amount)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Returns zero rupiah.
    #[inline]
    pub const fn zero() -> Self {
        Rupiah(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    ///
    /// ```rust
    /// use harvest_core::money::Rupiah;
    ///
    /// assert_eq!(Rupiah::from_amount(-500).abs().amount(), 500);
    /// ```
    #[inline]
    pub const fn abs(&self) -> Self {
        Rupiah(self.0.saturating_abs())
    }

    /// Multiplies a unit price by a harvested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Crop: Padi, sold at Rp 5.000 per unit
    /// Quantity: 100
    ///      │
    ///      ▼
    /// multiply_quantity(100) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Revenue: Rp 500.000
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Rupiah(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Indonesian locale currency, no fractional digits: `Rp 1.234.567`.
impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{sign}Rp {grouped}")
    }
}

impl Add for Rupiah {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Rupiah(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Rupiah {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Rupiah {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Rupiah(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Rupiah {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Sum for Rupiah {
    fn sum<I: Iterator<Item = Rupiah>>(iter: I) -> Self {
        iter.fold(Rupiah::zero(), |acc, value| acc + value)
    }
}

impl<'a> Sum<&'a Rupiah> for Rupiah {
    fn sum<I: Iterator<Item = &'a Rupiah>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
