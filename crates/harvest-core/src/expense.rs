//! # Expense Aggregator
//!
//! Computes the total cost of a crop from its itemized breakdown.
//!
//! ```text
//! total_expense = seeds + electricity + machinery + labor
//!               + water_usage + storage + transport
//!               + Σ fertilizers.cost + Σ pesticides.cost
//! ```
//!
//! No validation happens here. Malformed numbers were already coerced to
//! zero when the record crossed the data-model boundary, so the sum is
//! total: it always produces an answer.

use crate::money::Rupiah;
use crate::types::{ExpenseBreakdown, ExpenseField, LineItem, LineItemKind};

/// Sum of a line item list; empty lists contribute zero.
pub fn line_items_total(items: &[LineItem]) -> Rupiah {
    items.iter().map(|item| item.cost).sum()
}

/// Sum of the seven scalar cost fields.
pub fn scalar_total(expense: &ExpenseBreakdown) -> Rupiah {
    ExpenseField::ALL
        .iter()
        .map(|field| expense.scalar(*field))
        .sum()
}

/// Total expense of a breakdown.
///
/// ## Example
/// ```rust
/// use harvest_core::expense::total_expense;
/// use harvest_core::money::Rupiah;
/// use harvest_core::types::{ExpenseBreakdown, LineItem};
///
/// let expense = ExpenseBreakdown {
///     seeds: Rupiah::from_amount(100_000),
///     labor: Rupiah::from_amount(50_000),
///     fertilizers: vec![LineItem::new("Urea", Rupiah::from_amount(25_000))],
///     ..Default::default()
/// };
/// assert_eq!(total_expense(&expense).amount(), 175_000);
/// ```
pub fn total_expense(expense: &ExpenseBreakdown) -> Rupiah {
    LineItemKind::ALL
        .iter()
        .map(|kind| line_items_total(expense.line_items(*kind)))
        .fold(scalar_total(expense), |acc, subtotal| acc + subtotal)
}

impl ExpenseBreakdown {
    /// See [`total_expense`].
    #[inline]
    pub fn total(&self) -> Rupiah {
        total_expense(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rp(amount: i64) -> Rupiah {
        Rupiah::from_amount(amount)
    }

    #[test]
    fn test_all_zero_breakdown_totals_zero() {
        assert!(total_expense(&ExpenseBreakdown::default()).is_zero());
    }

    #[test]
    fn test_total_includes_every_component() {
        let expense = ExpenseBreakdown {
            seeds: rp(1),
            electricity: rp(2),
            machinery: rp(4),
            labor: rp(8),
            water_usage: rp(16),
            storage: rp(32),
            transport: rp(64),
            fertilizers: vec![LineItem::new("Urea", rp(128)), LineItem::new("NPK", rp(256))],
            pesticides: vec![LineItem::new("Decis", rp(512))],
        };

        assert_eq!(scalar_total(&expense).amount(), 127);
        assert_eq!(line_items_total(&expense.fertilizers).amount(), 384);
        assert_eq!(total_expense(&expense).amount(), 1023);
        assert_eq!(expense.total(), total_expense(&expense));
    }

    #[test]
    fn test_empty_line_item_lists_contribute_zero() {
        let expense = ExpenseBreakdown {
            seeds: rp(500),
            ..Default::default()
        };
        assert_eq!(total_expense(&expense).amount(), 500);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let expense = ExpenseBreakdown {
            transport: rp(20_000),
            pesticides: vec![LineItem::new("Decis", rp(15_000))],
            ..Default::default()
        };
        assert_eq!(total_expense(&expense), total_expense(&expense));
    }
}
