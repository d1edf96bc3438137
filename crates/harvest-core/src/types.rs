//! # Domain Types
//!
//! The crop sale record and its cost breakdown.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐                                                  │
//! │  │   CropRecord     │                                                  │
//! │  │  ──────────────  │   ┌─────────────────┐                            │
//! │  │  id (_id, store) │   │     Crop        │                            │
//! │  │  crop ───────────┼──►│  name, qty      │                            │
//! │  │  sold_at         │   └─────────────────┘                            │
//! │  │  expense ────────┼──►┌──────────────────────────────────┐           │
//! │  └──────────────────┘   │  ExpenseBreakdown                │           │
//! │                         │  seeds, electricity, machinery,  │           │
//! │                         │  labor, water_usage, storage,    │           │
//! │                         │  transport                       │           │
//! │                         │  fertilizers: [LineItem]         │           │
//! │                         │  pesticides:  [LineItem]         │           │
//! │                         └──────────────────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Boundary Normalization
//! Every field deserializes leniently (see [`crate::coerce`]): missing,
//! `null`, string or garbage numbers become zero values. A `CropRecord`
//! fetched from the store is therefore always complete, and the pure
//! functions downstream never need defensive fallbacks.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::coerce;
use crate::money::Rupiah;

// =============================================================================
// Line Items
// =============================================================================

/// A named cost entry (one fertilizer or one pesticide).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub name: String,

    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub cost: Rupiah,
}

impl LineItem {
    pub fn new(name: impl Into<String>, cost: Rupiah) -> Self {
        LineItem {
            name: name.into(),
            cost,
        }
    }
}

/// Which variable-length cost list a line item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    Fertilizer,
    Pesticide,
}

impl LineItemKind {
    /// Both kinds, in display order.
    pub const ALL: [LineItemKind; 2] = [LineItemKind::Fertilizer, LineItemKind::Pesticide];

    /// Key of the list inside `expense`.
    pub const fn key(&self) -> &'static str {
        match self {
            LineItemKind::Fertilizer => "fertilizers",
            LineItemKind::Pesticide => "pesticides",
        }
    }
}

impl fmt::Display for LineItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Scalar Expense Fields
// =============================================================================

/// The seven scalar cost fields of an expense breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseField {
    Seeds,
    Electricity,
    Machinery,
    Labor,
    WaterUsage,
    Storage,
    Transport,
}

impl ExpenseField {
    /// All scalar fields, in form order.
    pub const ALL: [ExpenseField; 7] = [
        ExpenseField::Seeds,
        ExpenseField::Electricity,
        ExpenseField::Machinery,
        ExpenseField::Labor,
        ExpenseField::WaterUsage,
        ExpenseField::Storage,
        ExpenseField::Transport,
    ];

    /// Wire key inside `expense`.
    pub const fn key(&self) -> &'static str {
        match self {
            ExpenseField::Seeds => "seeds",
            ExpenseField::Electricity => "electricity",
            ExpenseField::Machinery => "machinery",
            ExpenseField::Labor => "labor",
            ExpenseField::WaterUsage => "water_usage",
            ExpenseField::Storage => "storage",
            ExpenseField::Transport => "transport",
        }
    }

    /// Human-readable label for tables.
    pub const fn label(&self) -> &'static str {
        match self {
            ExpenseField::Seeds => "Seeds",
            ExpenseField::Electricity => "Electricity",
            ExpenseField::Machinery => "Machinery",
            ExpenseField::Labor => "Labor",
            ExpenseField::WaterUsage => "Water Usage",
            ExpenseField::Storage => "Storage",
            ExpenseField::Transport => "Transport",
        }
    }

    /// Looks up a field by its wire key.
    pub fn from_key(key: &str) -> Option<Self> {
        ExpenseField::ALL.into_iter().find(|f| f.key() == key)
    }
}

// =============================================================================
// Expense Breakdown
// =============================================================================

/// Structured cost data attached to a crop record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpenseBreakdown {
    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub seeds: Rupiah,

    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub electricity: Rupiah,

    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub machinery: Rupiah,

    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub labor: Rupiah,

    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub water_usage: Rupiah,

    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub storage: Rupiah,

    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub transport: Rupiah,

    /// Insertion order is preserved for display.
    #[serde(default, deserialize_with = "coerce::lenient_list")]
    pub fertilizers: Vec<LineItem>,

    #[serde(default, deserialize_with = "coerce::lenient_list")]
    pub pesticides: Vec<LineItem>,
}

impl ExpenseBreakdown {
    /// Returns one scalar cost field.
    pub fn scalar(&self, field: ExpenseField) -> Rupiah {
        match field {
            ExpenseField::Seeds => self.seeds,
            ExpenseField::Electricity => self.electricity,
            ExpenseField::Machinery => self.machinery,
            ExpenseField::Labor => self.labor,
            ExpenseField::WaterUsage => self.water_usage,
            ExpenseField::Storage => self.storage,
            ExpenseField::Transport => self.transport,
        }
    }

    /// Mutable access to one scalar cost field.
    pub fn scalar_mut(&mut self, field: ExpenseField) -> &mut Rupiah {
        match field {
            ExpenseField::Seeds => &mut self.seeds,
            ExpenseField::Electricity => &mut self.electricity,
            ExpenseField::Machinery => &mut self.machinery,
            ExpenseField::Labor => &mut self.labor,
            ExpenseField::WaterUsage => &mut self.water_usage,
            ExpenseField::Storage => &mut self.storage,
            ExpenseField::Transport => &mut self.transport,
        }
    }

    /// Returns the line items of one kind.
    pub fn line_items(&self, kind: LineItemKind) -> &[LineItem] {
        match kind {
            LineItemKind::Fertilizer => &self.fertilizers,
            LineItemKind::Pesticide => &self.pesticides,
        }
    }
}

// =============================================================================
// Crop Record
// =============================================================================

/// Crop identity and harvested quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Crop {
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub name: String,

    /// Units harvested.
    #[serde(default, deserialize_with = "coerce::lenient_integer")]
    #[ts(type = "number")]
    pub qty: i64,
}

/// One harvested-and-sold crop entry with its cost breakdown.
///
/// ## Lifecycle
/// ```text
/// CropDraft ──validate──► CropPayload ──POST──► store assigns _id
///                                                      │
///            ┌─────────────────────────────────────────┘
///            ▼
/// GET /v1/crop/getcrops ──► Vec<CropRecord> ──► metrics, filter, display
/// ```
///
/// Derived values (revenue, total expense, profit) are computed on demand
/// and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CropRecord {
    /// Opaque identifier assigned by the external store; absent until persisted.
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        deserialize_with = "coerce::lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(optional)]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "coerce::null_as_default")]
    pub crop: Crop,

    /// Price per unit of quantity.
    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub sold_at: Rupiah,

    #[serde(default, deserialize_with = "coerce::null_as_default")]
    pub expense: ExpenseBreakdown,
}

impl CropRecord {
    /// Creates an unpersisted record.
    pub fn new(name: impl Into<String>, qty: i64, sold_at: Rupiah, expense: ExpenseBreakdown) -> Self {
        CropRecord {
            id: None,
            crop: Crop {
                name: name.into(),
                qty,
            },
            sold_at,
            expense,
        }
    }

    /// Returns the record with its store id set.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns true once the store has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
