//! # Crop Draft
//!
//! The editable crop form as an immutable value plus a pure reducer.
//!
//! ## Form Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CropDraft::default()  or  CropDraft::from_record(&record)  (edit)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  draft.apply(DraftChange) ──► new CropDraft        (every keystroke)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validation::validate(&draft)  ── errors? ──► block, show all           │
//! │       │ ok                                                              │
//! │       ▼                                                                 │
//! │  draft.prepare() ──► CropPayload ──► POST / PUT                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every field is kept as the text the user typed; numbers only appear in
//! the prepared payload. `CropForm` bundles a draft with its displayed
//! errors and implements the clear-on-fix / re-validate-on-submit rules.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::coerce;
use crate::error::{CoreResult, FieldErrors};
use crate::money::Rupiah;
use crate::types::{Crop, CropRecord, ExpenseBreakdown, ExpenseField, LineItem, LineItemKind};
use crate::validation::{self, FieldPath};
use crate::MIN_LINE_ITEM_ROWS;

// =============================================================================
// Draft Types
// =============================================================================

/// One editable line item row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemDraft {
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub name: String,

    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub cost: String,
}

impl LineItemDraft {
    pub fn new(name: impl Into<String>, cost: impl Into<String>) -> Self {
        LineItemDraft {
            name: name.into(),
            cost: cost.into(),
        }
    }

    /// A row is kept only when its name is non-blank AND a cost was typed.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.cost.is_empty()
    }

    /// Coerces a complete row into a persisted line item.
    fn to_line_item(&self) -> LineItem {
        LineItem::new(self.name.trim(), coerce::amount(&self.cost))
    }
}

/// Which half of a line item row is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineItemField {
    Name,
    Cost,
}

/// Crop identity as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CropDraftFields {
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub name: String,

    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub qty: String,
}

/// Expense breakdown as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ExpenseDraft {
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub seeds: String,
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub electricity: String,
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub machinery: String,
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub labor: String,
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub water_usage: String,
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub storage: String,
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub transport: String,
    #[serde(deserialize_with = "editable_rows")]
    pub fertilizers: Vec<LineItemDraft>,
    #[serde(deserialize_with = "editable_rows")]
    pub pesticides: Vec<LineItemDraft>,
}

impl Default for ExpenseDraft {
    fn default() -> Self {
        ExpenseDraft {
            seeds: String::new(),
            electricity: String::new(),
            machinery: String::new(),
            labor: String::new(),
            water_usage: String::new(),
            storage: String::new(),
            transport: String::new(),
            fertilizers: blank_rows(),
            pesticides: blank_rows(),
        }
    }
}

impl ExpenseDraft {
    /// Text of one scalar field.
    pub fn scalar(&self, field: ExpenseField) -> &str {
        match field {
            ExpenseField::Seeds => &self.seeds,
            ExpenseField::Electricity => &self.electricity,
            ExpenseField::Machinery => &self.machinery,
            ExpenseField::Labor => &self.labor,
            ExpenseField::WaterUsage => &self.water_usage,
            ExpenseField::Storage => &self.storage,
            ExpenseField::Transport => &self.transport,
        }
    }

    pub fn scalar_mut(&mut self, field: ExpenseField) -> &mut String {
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

    pub fn rows(&self, kind: LineItemKind) -> &[LineItemDraft] {
        match kind {
            LineItemKind::Fertilizer => &self.fertilizers,
            LineItemKind::Pesticide => &self.pesticides,
        }
    }

    fn rows_mut(&mut self, kind: LineItemKind) -> &mut Vec<LineItemDraft> {
        match kind {
            LineItemKind::Fertilizer => &mut self.fertilizers,
            LineItemKind::Pesticide => &mut self.pesticides,
        }
    }
}

fn blank_rows() -> Vec<LineItemDraft> {
    vec![LineItemDraft::default(); MIN_LINE_ITEM_ROWS]
}

/// Pads a row list with blank rows up to `MIN_LINE_ITEM_ROWS`.
fn pad_rows(mut rows: Vec<LineItemDraft>) -> Vec<LineItemDraft> {
    if rows.len() < MIN_LINE_ITEM_ROWS {
        rows.resize(MIN_LINE_ITEM_ROWS, LineItemDraft::default());
    }
    rows
}

/// Deserializes a row list; `null`, `[]` and malformed rows still leave
/// at least one row to type into.
fn editable_rows<'de, D>(deserializer: D) -> Result<Vec<LineItemDraft>, D::Error>
where
    D: Deserializer<'de>,
{
    coerce::lenient_list(deserializer).map(pad_rows)
}

/// The crop form: everything the user typed, nothing coerced yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CropDraft {
    pub crop: CropDraftFields,
    #[serde(deserialize_with = "coerce::lenient_text")]
    pub sold_at: String,
    pub expense: ExpenseDraft,
}

// =============================================================================
// Reducer
// =============================================================================

/// One user edit of the crop form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DraftChange {
    /// Replace the text of a validated field.
    Set {
        #[ts(type = "string")]
        field: FieldPath,
        value: String,
    },

    /// Replace the name or cost of one line item row.
    SetLineItem {
        kind: LineItemKind,
        index: usize,
        field: LineItemField,
        value: String,
    },

    /// Append a blank row.
    AddLineItem { kind: LineItemKind },

    /// Remove a row; the last remaining row is never removed.
    RemoveLineItem { kind: LineItemKind, index: usize },
}

impl CropDraft {
    /// Seeds the form from a stored record (edit mode).
    ///
    /// Empty line item lists come back as one blank row so the form always
    /// has something to type into.
    pub fn from_record(record: &CropRecord) -> Self {
        let rows = |items: &[LineItem]| -> Vec<LineItemDraft> {
            pad_rows(
                items
                    .iter()
                    .map(|item| LineItemDraft::new(item.name.clone(), item.cost.amount().to_string()))
                    .collect(),
            )
        };

        let mut expense = ExpenseDraft {
            fertilizers: rows(&record.expense.fertilizers),
            pesticides: rows(&record.expense.pesticides),
            ..ExpenseDraft::default()
        };
        for field in ExpenseField::ALL {
            *expense.scalar_mut(field) = record.expense.scalar(field).amount().to_string();
        }

        CropDraft {
            crop: CropDraftFields {
                name: record.crop.name.clone(),
                qty: record.crop.qty.to_string(),
            },
            sold_at: record.sold_at.amount().to_string(),
            expense,
        }
    }

    /// Text currently held by a validated field.
    pub fn value(&self, field: FieldPath) -> &str {
        match field {
            FieldPath::CropName => &self.crop.name,
            FieldPath::CropQty => &self.crop.qty,
            FieldPath::SoldAt => &self.sold_at,
            FieldPath::Expense(expense) => self.expense.scalar(expense),
        }
    }

    /// Applies one edit and returns the new draft.
    ///
    /// Out-of-range row indices leave the draft unchanged.
    ///
    /// ```rust
    /// use harvest_core::draft::{CropDraft, DraftChange};
    /// use harvest_core::validation::FieldPath;
    ///
    /// let draft = CropDraft::default().apply(DraftChange::Set {
    ///     field: FieldPath::CropName,
    ///     value: "Padi".into(),
    /// });
    /// assert_eq!(draft.crop.name, "Padi");
    /// ```
    #[must_use]
    pub fn apply(mut self, change: DraftChange) -> Self {
        match change {
            DraftChange::Set { field, value } => match field {
                FieldPath::CropName => self.crop.name = value,
                FieldPath::CropQty => self.crop.qty = value,
                FieldPath::SoldAt => self.sold_at = value,
                FieldPath::Expense(expense) => *self.expense.scalar_mut(expense) = value,
            },
            DraftChange::SetLineItem {
                kind,
                index,
                field,
                value,
            } => {
                if let Some(row) = self.expense.rows_mut(kind).get_mut(index) {
                    match field {
                        LineItemField::Name => row.name = value,
                        LineItemField::Cost => row.cost = value,
                    }
                }
            }
            DraftChange::AddLineItem { kind } => {
                self.expense.rows_mut(kind).push(LineItemDraft::default());
            }
            DraftChange::RemoveLineItem { kind, index } => {
                let rows = self.expense.rows_mut(kind);
                if rows.len() > MIN_LINE_ITEM_ROWS && index < rows.len() {
                    rows.remove(index);
                }
            }
        }
        self
    }

    /// Builds the payload sent to create/update.
    ///
    /// Scalars are coerced to numbers, the name is trimmed, and line item
    /// rows are kept only when complete. Call after validation passes.
    pub fn prepare(&self) -> CropPayload {
        let items = |rows: &[LineItemDraft]| -> Vec<LineItem> {
            rows.iter()
                .filter(|row| row.is_complete())
                .map(LineItemDraft::to_line_item)
                .collect()
        };

        let mut expense = ExpenseBreakdown {
            fertilizers: items(&self.expense.fertilizers),
            pesticides: items(&self.expense.pesticides),
            ..ExpenseBreakdown::default()
        };
        for field in ExpenseField::ALL {
            *expense.scalar_mut(field) = coerce::amount(self.expense.scalar(field));
        }

        CropPayload {
            crop: Crop {
                name: self.crop.name.trim().to_string(),
                qty: coerce::integer(&self.crop.qty),
            },
            sold_at: coerce::amount(&self.sold_at),
            expense,
        }
    }
}

// =============================================================================
// Payload
// =============================================================================

/// The prepared create/update body: a crop record without its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CropPayload {
    pub crop: Crop,
    pub sold_at: Rupiah,
    pub expense: ExpenseBreakdown,
}

impl CropPayload {
    /// Attaches a store id, producing the persisted record.
    pub fn into_record(self, id: impl Into<String>) -> CropRecord {
        CropRecord {
            id: Some(id.into()),
            crop: self.crop,
            sold_at: self.sold_at,
            expense: self.expense,
        }
    }
}

// =============================================================================
// Form State
// =============================================================================

/// A draft together with the errors currently shown on the form.
///
/// ## Error Lifecycle
/// ```text
/// submit() ──► full validation ──► errors shown
///                                       │
/// change(Set{field, ..}) ──► field now valid? ──► that error cleared
///                                       │
/// submit() ──► full validation AGAIN (edits may have broken other fields)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CropForm {
    draft: CropDraft,
    errors: FieldErrors,
}

impl CropForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the form on an existing record.
    pub fn edit(record: &CropRecord) -> Self {
        CropForm {
            draft: CropDraft::from_record(record),
            errors: FieldErrors::new(),
        }
    }

    /// Wraps an already-built draft, restoring the minimum row count.
    pub fn from_draft(mut draft: CropDraft) -> Self {
        for kind in LineItemKind::ALL {
            let rows = draft.expense.rows_mut(kind);
            *rows = pad_rows(std::mem::take(rows));
        }
        CropForm {
            draft,
            errors: FieldErrors::new(),
        }
    }

    pub fn draft(&self) -> &CropDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Applies an edit; a field that became valid loses its error.
    ///
    /// Errors are only ever cleared here, never added.
    pub fn change(&mut self, change: DraftChange) {
        let touched = match &change {
            DraftChange::Set { field, .. } => Some(*field),
            _ => None,
        };

        self.draft = std::mem::take(&mut self.draft).apply(change);

        if let Some(field) = touched {
            if validation::validate_field(&self.draft, field).is_ok() {
                self.errors.remove(field);
            }
        }
    }

    /// Re-validates everything and yields the payload when clean.
    ///
    /// On failure the full error map replaces the displayed errors.
    pub fn submit(&mut self) -> CoreResult<CropPayload> {
        match validation::validate(&self.draft) {
            Ok(()) => {
                self.errors.clear();
                Ok(self.draft.prepare())
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors.into())
            }
        }
    }

    /// Back to a blank form with no errors.
    pub fn reset(&mut self) {
        *self = CropForm::default();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn set(field: FieldPath, value: &str) -> DraftChange {
        DraftChange::Set {
            field,
            value: value.to_string(),
        }
    }

    fn set_row(kind: LineItemKind, index: usize, field: LineItemField, value: &str) -> DraftChange {
        DraftChange::SetLineItem {
            kind,
            index,
            field,
            value: value.to_string(),
        }
    }

    fn filled_draft() -> CropDraft {
        let mut draft = CropDraft::default()
            .apply(set(FieldPath::CropName, "  Padi "))
            .apply(set(FieldPath::CropQty, "100"))
            .apply(set(FieldPath::SoldAt, "5000"));
        for field in ExpenseField::ALL {
            draft = draft.apply(set(FieldPath::Expense(field), "1000"));
        }
        draft
    }

    #[test]
    fn test_default_has_one_blank_row_per_list() {
        let draft = CropDraft::default();
        assert_eq!(draft.expense.fertilizers, vec![LineItemDraft::default()]);
        assert_eq!(draft.expense.pesticides, vec![LineItemDraft::default()]);
    }

    #[test]
    fn test_apply_does_not_touch_other_fields() {
        let before = filled_draft();
        let after = before.clone().apply(set(FieldPath::Expense(ExpenseField::Labor), "7"));

        assert_eq!(after.expense.labor, "7");
        assert_eq!(after.expense.seeds, before.expense.seeds);
        assert_eq!(after.crop, before.crop);
    }

    #[test]
    fn test_line_item_rows() {
        let kind = LineItemKind::Fertilizer;
        let draft = CropDraft::default()
            .apply(DraftChange::AddLineItem { kind })
            .apply(set_row(kind, 1, LineItemField::Name, "Urea"))
            .apply(set_row(kind, 1, LineItemField::Cost, "50000"));

        assert_eq!(draft.expense.fertilizers.len(), 2);
        assert_eq!(draft.expense.fertilizers[1], LineItemDraft::new("Urea", "50000"));
        assert_eq!(draft.expense.pesticides.len(), 1);

        // out of range: ignored
        let unchanged = draft.clone().apply(set_row(kind, 9, LineItemField::Name, "x"));
        assert_eq!(unchanged, draft);
    }

    #[test]
    fn test_remove_keeps_minimum_one_row() {
        let kind = LineItemKind::Pesticide;
        let draft = CropDraft::default().apply(DraftChange::RemoveLineItem { kind, index: 0 });
        assert_eq!(draft.expense.pesticides.len(), 1);

        let draft = draft
            .apply(DraftChange::AddLineItem { kind })
            .apply(set_row(kind, 0, LineItemField::Name, "Decis"))
            .apply(DraftChange::RemoveLineItem { kind, index: 0 });
        assert_eq!(draft.expense.pesticides, vec![LineItemDraft::default()]);
    }

    #[test]
    fn test_prepare_filters_incomplete_rows() {
        let kind = LineItemKind::Fertilizer;
        let draft = filled_draft()
            .apply(set_row(kind, 0, LineItemField::Name, " Urea "))
            .apply(set_row(kind, 0, LineItemField::Cost, "50000"))
            .apply(DraftChange::AddLineItem { kind })
            .apply(DraftChange::AddLineItem { kind })
            .apply(set_row(kind, 2, LineItemField::Name, "NPK"))
            .apply(DraftChange::AddLineItem { kind })
            .apply(set_row(kind, 3, LineItemField::Cost, "9000"));

        let payload = draft.prepare();
        assert_eq!(
            payload.expense.fertilizers,
            vec![LineItem::new("Urea", Rupiah::from_amount(50_000))]
        );
        // the untouched pesticide row is blank
        assert!(payload.expense.pesticides.is_empty());
    }

    #[test]
    fn test_prepare_coerces_scalars() {
        let payload = filled_draft().prepare();
        assert_eq!(payload.crop.name, "Padi");
        assert_eq!(payload.crop.qty, 100);
        assert_eq!(payload.sold_at.amount(), 5_000);
        assert_eq!(payload.expense.total().amount(), 7_000);
    }

    #[test]
    fn test_from_record_round_trips_through_prepare() {
        let record = CropRecord::new(
            "Jagung",
            50,
            Rupiah::from_amount(3_000),
            ExpenseBreakdown {
                seeds: Rupiah::from_amount(10_000),
                pesticides: vec![LineItem::new("Decis", Rupiah::from_amount(15_000))],
                ..Default::default()
            },
        );

        let draft = CropDraft::from_record(&record);
        assert_eq!(draft.crop.qty, "50");
        assert_eq!(draft.expense.seeds, "10000");
        assert_eq!(draft.expense.fertilizers, vec![LineItemDraft::default()]);

        let payload = draft.prepare();
        assert_eq!(payload.clone().into_record("r1"), record.with_id("r1"));
    }

    #[test]
    fn test_draft_deserializes_numbers_as_text() {
        let draft: CropDraft = serde_json::from_value(serde_json::json!({
            "crop": {"name": "Padi", "qty": 100},
            "sold_at": 5000,
            "expense": {"seeds": 0, "fertilizers": [{"name": "Urea", "cost": 50000}]}
        }))
        .unwrap();

        assert_eq!(draft.crop.qty, "100");
        assert_eq!(draft.sold_at, "5000");
        assert_eq!(draft.expense.seeds, "0");
        assert_eq!(draft.expense.labor, "");
        assert_eq!(draft.expense.fertilizers, vec![LineItemDraft::new("Urea", "50000")]);
        assert_eq!(draft.expense.pesticides, vec![LineItemDraft::default()]);
    }

    #[test]
    fn test_empty_row_lists_keep_one_blank_row() {
        let draft: CropDraft = serde_json::from_value(serde_json::json!({
            "crop": {"name": "Padi", "qty": 100},
            "sold_at": 5000,
            "expense": {"fertilizers": [], "pesticides": null}
        }))
        .unwrap();

        assert_eq!(draft.expense.fertilizers, vec![LineItemDraft::default()]);
        assert_eq!(draft.expense.pesticides, vec![LineItemDraft::default()]);
    }

    #[test]
    fn test_form_from_draft_restores_row_minimum() {
        let mut draft = filled_draft();
        draft.expense.fertilizers.clear();
        draft.expense.pesticides.clear();

        let form = CropForm::from_draft(draft);
        for kind in LineItemKind::ALL {
            assert_eq!(form.draft().expense.rows(kind).len(), MIN_LINE_ITEM_ROWS);
        }
    }

    #[test]
    fn test_form_clears_error_once_field_is_fixed() {
        let mut form = CropForm::new();
        assert!(form.submit().is_err());
        assert!(form.errors().contains(FieldPath::CropName));

        form.change(set(FieldPath::CropName, "Padi"));
        assert!(!form.errors().contains(FieldPath::CropName));

        // still invalid: error stays
        form.change(set(FieldPath::SoldAt, "-3"));
        assert!(form.errors().contains(FieldPath::SoldAt));
    }

    #[test]
    fn test_form_change_never_adds_errors() {
        let mut form = CropForm::new();
        form.change(set(FieldPath::SoldAt, "-3"));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_submit_revalidates_after_cleared_errors() {
        let mut form = CropForm::from_draft(filled_draft());
        form.change(set(FieldPath::Expense(ExpenseField::Storage), ""));

        let err = form.submit().unwrap_err();
        match err {
            CoreError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains(FieldPath::Expense(ExpenseField::Storage)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(form.errors().contains(FieldPath::Expense(ExpenseField::Storage)));
    }

    #[test]
    fn test_submit_success_clears_errors() {
        let mut form = CropForm::from_draft(filled_draft().apply(set(FieldPath::CropName, "")));
        assert!(form.submit().is_err());

        form.change(set(FieldPath::CropName, "Padi"));
        let payload = form.submit().unwrap();
        assert_eq!(payload.crop.name, "Padi");
        assert!(form.errors().is_empty());

        form.reset();
        assert_eq!(form, CropForm::default());
    }

    #[test]
    fn test_change_serializes_with_type_tag() {
        let change: DraftChange = serde_json::from_value(serde_json::json!({
            "type": "set",
            "field": "expense.water_usage",
            "value": "250"
        }))
        .unwrap();
        assert_eq!(change, set(FieldPath::Expense(ExpenseField::WaterUsage), "250"));
    }
}
