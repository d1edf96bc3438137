//! # harvest-core: Pure Farm Expense & Profitability Logic
//!
//! Everything Harvest Ledger knows about money lives here: what a crop sale
//! cost, what it earned, whether a draft may be saved, and which records a
//! filter shows. No I/O of any kind.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Harvest Ledger Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    harvest CLI (apps/cli)                       │   │
//! │  │        list ──► add / update ──► delete                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        harvest-client: FarmLedger, CropStore, retry, config     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ harvest-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐         │   │
//! │  │   │  types   │ │ expense  │ │  profit  │ │  filter  │         │   │
//! │  │   │  Record  │ │  total   │ │ revenue  │ │ criteria │         │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘         │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐         │   │
//! │  │   │  draft   │ │validation│ │  money   │ │  coerce  │         │   │
//! │  │   │ reducer  │ │  rules   │ │  Rupiah  │ │ lenient  │         │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘         │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Crop record and expense breakdown
//! - [`money`] - Integer rupiah amounts and display
//! - [`coerce`] - Lenient text/JSON to number conversion
//! - [`expense`] - Expense aggregation
//! - [`profit`] - Revenue, profit and derived metrics
//! - [`draft`] - Editable form draft and its reducer
//! - [`validation`] - Draft validation
//! - [`filter`] - Record filtering
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use harvest_core::money::Rupiah;
//! use harvest_core::types::{CropRecord, ExpenseBreakdown, LineItem};
//!
//! let expense = ExpenseBreakdown {
//!     seeds: Rupiah::from_amount(300),
//!     fertilizers: vec![LineItem::new("Urea", Rupiah::from_amount(200))],
//!     ..Default::default()
//! };
//! let record = CropRecord::new("Padi", 10, Rupiah::from_amount(100), expense);
//!
//! assert_eq!(record.revenue().amount(), 1_000);
//! assert_eq!(record.total_expense().amount(), 500);
//! assert_eq!(record.profit().to_string(), "Rp 500");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coerce;
pub mod draft;
pub mod error;
pub mod expense;
pub mod filter;
pub mod money;
pub mod profit;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{CropDraft, CropForm, CropPayload, DraftChange, LineItemDraft, LineItemField};
pub use error::{CoreError, CoreResult, FieldError, FieldErrors};
pub use expense::total_expense;
pub use filter::{filter, FilterCriteria};
pub use money::Rupiah;
pub use profit::{profit, revenue, CropMetrics, ProfitStatus};
pub use types::*;
pub use validation::{validate, FieldPath};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Line item rows a form list always keeps, even when all are blank.
pub const MIN_LINE_ITEM_ROWS: usize = 1;
