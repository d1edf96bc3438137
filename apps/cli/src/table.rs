//! Plain-text rendering of the crop table.

use harvest_client::CropRow;
use harvest_core::{FieldErrors, ProfitStatus};

const HEADERS: [&str; 7] = [
    "ID",
    "Crop",
    "Qty",
    "Sold at",
    "Total revenue",
    "Total expense",
    "Profit / loss",
];

/// Renders rows as an aligned table; money right-aligned.
pub fn render(rows: &[CropRow]) -> String {
    if rows.is_empty() {
        return "No crops found.\n".to_string();
    }

    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|row| {
            [
                row.record.id.clone().unwrap_or_default(),
                row.record.crop.name.clone(),
                row.record.crop.qty.to_string(),
                row.record.sold_at.to_string(),
                row.metrics.revenue.to_string(),
                row.metrics.total_expense.to_string(),
                ProfitStatus::label(row.metrics.profit),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for line in &cells {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let rendered: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(column, (cell, width))| {
            let pad = width.saturating_sub(cell.chars().count());
            if column >= 2 {
                format!("{}{}", " ".repeat(pad), cell)
            } else {
                format!("{}{}", cell, " ".repeat(pad))
            }
        })
        .collect();
    out.push_str(rendered.join("  ").trim_end());
    out.push('\n');
}

/// One line per invalid field.
pub fn render_field_errors(errors: &FieldErrors) -> String {
    errors
        .into_iter()
        .map(|(path, error)| format!("  {path}: {error}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::{CropRecord, ExpenseBreakdown, FieldError, FieldPath, Rupiah};

    fn row(name: &str, qty: i64, sold_at: i64, labor: i64) -> CropRow {
        let expense = ExpenseBreakdown {
            labor: Rupiah::from_amount(labor),
            ..Default::default()
        };
        let record = CropRecord::new(name, qty, Rupiah::from_amount(sold_at), expense).with_id("r1");
        CropRow {
            metrics: record.metrics(),
            record,
        }
    }

    #[test]
    fn test_render_table() {
        let out = render(&[row("Padi", 10, 100, 500), row("Jagung", 10, 100, 1_500)]);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[0].contains("Total revenue"));
        assert!(lines[2].contains("Padi"));
        assert!(lines[2].contains("Rp 1.000"));
        assert!(lines[2].ends_with("Rp 500 profit"));
        assert!(lines[3].ends_with("Rp 500 loss"));
        assert!(lines[3].contains("Rp 1.500"));

        // revenue sits between the sale price and the expense total
        let cells: Vec<&str> = lines[3].split("  ").filter(|c| !c.trim().is_empty()).collect();
        assert_eq!(cells[4].trim(), "Rp 1.000");
        assert_eq!(cells[5].trim(), "Rp 1.500");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "No crops found.\n");
    }

    #[test]
    fn test_render_field_errors() {
        let errors: FieldErrors = [FieldError::InvalidRange {
            field: FieldPath::SoldAt,
        }]
        .into_iter()
        .collect();
        assert_eq!(
            render_field_errors(&errors),
            "  sold_at: Sold price is required and must be ≥ 0\n"
        );
    }
}
