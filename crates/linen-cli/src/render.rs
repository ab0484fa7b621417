//! Plain-text layouts for the summary, linen list and history.
//!
//! Nothing here colors output; commands add color on top.

use linen_sdk::confirm::display_time;
use linen_sdk::{SummaryProjection, Totals, Transaction};

const EMPTY_CELL: &str = "\u{2014}";

/// `+10, +20`, or an em dash when there are no entries.
pub fn format_entries(values: &[u64], prefix: &str) -> String {
    if values.is_empty() {
        return EMPTY_CELL.to_string();
    }
    values
        .iter()
        .map(|v| format!("{prefix}{v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The daily summary as an aligned table with a grand-total footer.
pub fn summary_table(summary: &SummaryProjection) -> String {
    let header = [
        "Linen",
        "Deliveries (+)",
        "Collections (-)",
        "Total +",
        "Total -",
        "Balance",
    ]
    .map(String::from);

    let mut rows: Vec<[String; 6]> = summary
        .rows
        .iter()
        .map(|row| {
            [
                row.name.clone(),
                format_entries(&row.plus, "+"),
                format_entries(&row.minus, "-"),
                row.totals.plus_total.to_string(),
                row.totals.minus_total.to_string(),
                row.totals.balance.to_string(),
            ]
        })
        .collect();
    rows.push(totals_row("Total", &summary.grand));

    let mut widths = header.clone().map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("  ").trim_end());
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn totals_row(label: &str, totals: &Totals) -> [String; 6] {
    [
        label.to_string(),
        String::new(),
        String::new(),
        totals.plus_total.to_string(),
        totals.minus_total.to_string(),
        totals.balance.to_string(),
    ]
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(column, (cell, &width))| {
            // Text columns align left, numbers right.
            if column < 3 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// One line of the linen list.
pub fn linen_line(index: usize, name: &str, totals: &Totals) -> String {
    format!(
        "{index:>3}  {name}  Deliveries: {}  Collections: {}  Balance: {}",
        totals.plus_total,
        totals.minus_total,
        totals.balance_label()
    )
}

/// One line of the history listing.
pub fn history_line(transaction: &Transaction) -> String {
    format!(
        "{}  {}  {}  {} {}",
        transaction.id.short_id(),
        display_time(&transaction.timestamp),
        transaction.linen_name,
        transaction.movement.label(),
        transaction.amount
    )
}

#[cfg(test)]
mod tests {
    use linen_sdk::{Document, LinenType, Movement, ProjectionBuilder, Timestamp};

    use super::*;

    #[test]
    fn entries_are_prefixed_and_joined() {
        assert_eq!(format_entries(&[10, 20, 5], "+"), "+10, +20, +5");
        assert_eq!(format_entries(&[3], "-"), "-3");
        assert_eq!(format_entries(&[], "+"), "\u{2014}");
    }

    #[test]
    fn summary_table_has_header_rows_and_total() {
        let doc = Document::with_linens(vec![
            LinenType::with_counts("Towels", vec![10, 5], vec![3]),
            LinenType::new("Robes"),
        ]);
        let summary = ProjectionBuilder::summary(&doc);
        let table = summary_table(&summary);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Linen"));
        assert!(lines[2].starts_with("Towels"));
        assert!(lines[2].contains("+10, +5"));
        assert!(lines[2].ends_with("12"));
        assert!(lines[3].contains("\u{2014}"));
        assert!(lines[4].starts_with("Total"));
        assert!(lines[4].ends_with("12"));
    }

    #[test]
    fn linen_line_uses_signed_balance() {
        let totals = Totals {
            plus_total: 2,
            minus_total: 9,
            balance: -7,
        };
        assert_eq!(
            linen_line(1, "Mats", &totals),
            "  1  Mats  Deliveries: 2  Collections: 9  Balance: -7"
        );
    }

    #[test]
    fn history_line_shows_label_and_amount() {
        let t = Transaction::new(
            "Robes",
            Movement::Delivery,
            6,
            Timestamp::from("2025-01-01T08:00:00.000Z"),
        );
        let line = history_line(&t);
        assert!(line.starts_with(&t.id.short_id()));
        assert!(line.ends_with("2025-01-01 08:00:00  Robes  Delivery (+) 6"));
    }
}
