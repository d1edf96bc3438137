//! # Profitability Calculator
//!
//! Derives revenue and profit/loss from a crop record.
//!
//! ```text
//! revenue = sold_at × crop.qty
//! profit  = revenue − total_expense      (negative = loss)
//! ```
//!
//! Values are recomputed on every render/filter pass; record sets are
//! farm-sized, so nothing is cached.

use serde::Serialize;
use std::fmt;
use ts_rs::TS;

use crate::expense::total_expense;
use crate::money::Rupiah;
use crate::types::CropRecord;

/// Revenue of a record: unit price times quantity.
#[inline]
pub fn revenue(record: &CropRecord) -> Rupiah {
    record.sold_at.multiply_quantity(record.crop.qty)
}

/// Profit of a record; negative denotes a loss.
///
/// ## Example
/// ```rust
/// use harvest_core::money::Rupiah;
/// use harvest_core::profit::profit;
/// use harvest_core::types::{CropRecord, ExpenseBreakdown};
///
/// let expense = ExpenseBreakdown { seeds: Rupiah::from_amount(500), ..Default::default() };
/// let record = CropRecord::new("Padi", 10, Rupiah::from_amount(100), expense);
/// assert_eq!(profit(&record).amount(), 500);
/// ```
#[inline]
pub fn profit(record: &CropRecord) -> Rupiah {
    revenue(record) - total_expense(&record.expense)
}

// =============================================================================
// Metrics
// =============================================================================

/// Whether a record made money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProfitStatus {
    /// Profit is zero or positive.
    Profit,
    Loss,
}

impl ProfitStatus {
    pub fn of(profit: Rupiah) -> Self {
        if profit.is_negative() {
            ProfitStatus::Loss
        } else {
            ProfitStatus::Profit
        }
    }

    /// Table cell text: absolute amount followed by the status word.
    ///
    /// ```rust
    /// use harvest_core::money::Rupiah;
    /// use harvest_core::profit::ProfitStatus;
    ///
    /// assert_eq!(ProfitStatus::label(Rupiah::from_amount(-500)), "Rp 500 loss");
    /// ```
    pub fn label(profit: Rupiah) -> String {
        format!("{} {}", profit.abs(), ProfitStatus::of(profit))
    }
}

impl fmt::Display for ProfitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitStatus::Profit => write!(f, "profit"),
            ProfitStatus::Loss => write!(f, "loss"),
        }
    }
}

/// The derived financial metrics of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CropMetrics {
    pub revenue: Rupiah,
    pub total_expense: Rupiah,
    pub profit: Rupiah,
    pub status: ProfitStatus,
}

impl CropMetrics {
    pub fn of(record: &CropRecord) -> Self {
        let revenue = revenue(record);
        let total_expense = total_expense(&record.expense);
        let profit = revenue - total_expense;

        CropMetrics {
            revenue,
            total_expense,
            profit,
            status: ProfitStatus::of(profit),
        }
    }
}

impl CropRecord {
    /// See [`revenue`].
    #[inline]
    pub fn revenue(&self) -> Rupiah {
        revenue(self)
    }

    /// Total expense of the record's breakdown.
    #[inline]
    pub fn total_expense(&self) -> Rupiah {
        total_expense(&self.expense)
    }

    /// See [`profit`].
    #[inline]
    pub fn profit(&self) -> Rupiah {
        profit(self)
    }

    /// All derived metrics at once.
    #[inline]
    pub fn metrics(&self) -> CropMetrics {
        CropMetrics::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExpenseBreakdown;

    fn record_with_expense(sold_at: i64, qty: i64, expense: i64) -> CropRecord {
        let expense = ExpenseBreakdown {
            labor: Rupiah::from_amount(expense),
            ..Default::default()
        };
        CropRecord::new("Padi", qty, Rupiah::from_amount(sold_at), expense)
    }

    #[test]
    fn test_profit_case() {
        let record = record_with_expense(100, 10, 500);
        assert_eq!(revenue(&record).amount(), 1_000);
        assert_eq!(profit(&record).amount(), 500);
        assert_eq!(record.metrics().status, ProfitStatus::Profit);
    }

    #[test]
    fn test_loss_case() {
        let record = record_with_expense(100, 10, 1_500);
        assert_eq!(record.revenue().amount(), 1_000);
        assert_eq!(record.total_expense().amount(), 1_500);
        assert_eq!(record.profit().amount(), -500);
        assert_eq!(record.metrics().status, ProfitStatus::Loss);
    }

    #[test]
    fn test_break_even_counts_as_profit() {
        let record = record_with_expense(100, 10, 1_000);
        assert!(record.profit().is_zero());
        assert_eq!(record.metrics().status, ProfitStatus::Profit);
        assert_eq!(ProfitStatus::label(record.profit()), "Rp 0 profit");
    }

    #[test]
    fn test_labels() {
        assert_eq!(ProfitStatus::label(Rupiah::from_amount(1_250_000)), "Rp 1.250.000 profit");
        assert_eq!(ProfitStatus::label(Rupiah::from_amount(-500)), "Rp 500 loss");
    }

    #[test]
    fn test_metrics_are_deterministic() {
        let record = record_with_expense(5_000, 100, 123_456);
        assert_eq!(record.metrics(), record.metrics());
        assert_eq!(record.metrics().profit, record.profit());
    }
}
