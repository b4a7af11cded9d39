use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::ImportResult;
use bbfs_db::models::{DuplicateOccurrence, HistoryEntry};
use bbfs_engine::calculator::BbfsResults;
use bbfs_engine::classify::Class;
use bbfs_engine::digits::DigitMultiset;
use bbfs_engine::dimension::Dimension;
use bbfs_engine::pricing::{format_cost, CostRow, PriceTier};

fn class_color(class: Class) -> Color {
    match class {
        Class::Single => Color::Cyan,
        Class::Twin => Color::Yellow,
        Class::TwinPlus => Color::Magenta,
    }
}

fn tier_name(tier: PriceTier) -> &'static str {
    match tier {
        PriceTier::Full => "full",
        PriceTier::Diskon => "diskon",
        PriceTier::Super => "super",
    }
}

fn digit_string(digits: &[char]) -> String {
    digits.iter().collect()
}

pub fn display_multiset(multiset: &DigitMultiset) {
    if multiset.is_empty() {
        println!("No digits in input.");
        return;
    }
    let counts = multiset
        .counts
        .iter()
        .map(|(d, n)| format!("{d}×{n}"))
        .collect::<Vec<_>>()
        .join(" ");
    println!("Digits   : {}", digit_string(&multiset.distinct_digits));
    println!("Repeated : {}", if multiset.repeated_digits.is_empty() {
        "—".to_string()
    } else {
        digit_string(&multiset.repeated_digits)
    });
    println!("Supply   : {counts}");
}

pub fn display_summary(rows: &[CostRow], tier: PriceTier) {
    println!("\nSummary (price tier: {})\n", tier_name(tier));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Dim", "SGL", "TWN", "TWN+", "Total", "Cost SGL", "Cost TWN", "Cost TWN+", "Cost"]);

    let mut grand_count = 0;
    let mut grand_cost = 0.0;
    for row in rows {
        let dim_cell = if row.selected {
            Cell::new(row.dim.to_string())
        } else {
            Cell::new(format!("{} (off)", row.dim)).fg(Color::DarkGrey)
        };
        let mut cells = vec![dim_cell];
        for (i, class) in Class::ALL.iter().enumerate() {
            cells.push(Cell::new(row.counts[i]).fg(class_color(*class)));
        }
        cells.push(Cell::new(row.total_count()));
        for cost in row.costs {
            cells.push(Cell::new(format_cost(cost)));
        }
        cells.push(Cell::new(format_cost(row.total_cost())));
        table.add_row(cells);

        if row.selected {
            grand_count += row.total_count();
            grand_cost += row.total_cost();
        }
    }
    println!("{table}");
    println!("Selected lines: {grand_count}   Total cost: {}", format_cost(grand_cost));
}

pub fn display_results(results: &BbfsResults, selected: &[Dimension]) {
    for dim in Dimension::ALL {
        if !selected.contains(&dim) {
            continue;
        }
        let res = results.get(dim);
        if res.is_empty() {
            continue;
        }
        println!("\n── {dim} ──");
        for class in Class::ALL {
            let items = res.class(class);
            if items.is_empty() {
                continue;
            }
            println!("{} ({}): {}", class, items.len(), items.join(" "));
        }
    }
}

pub fn display_entries(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No entries to show.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Slot", "Result", "BBFS"]);

    for entry in entries {
        let result = if entry.result.is_empty() {
            "----".to_string()
        } else {
            entry.result.clone()
        };
        table.add_row(vec![
            Cell::new(&entry.date),
            Cell::new(&entry.slot).fg(Color::Cyan),
            Cell::new(result).fg(Color::Yellow),
            Cell::new(&entry.digits),
        ]);
    }

    println!("{table}");
}

pub fn display_duplicates(dups: &[DuplicateOccurrence]) {
    if dups.is_empty() {
        println!("No BBFS digit set has come out more than once.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["BBFS", "Date", "Slot", "#"]);

    let mut sorted = dups.to_vec();
    sorted.sort_by(|a, b| a.digits.cmp(&b.digits).then(a.occurrence.cmp(&b.occurrence)));

    for dup in &sorted {
        let color = if dup.occurrence > 1 { Color::Red } else { Color::White };
        table.add_row(vec![
            Cell::new(&dup.digits),
            Cell::new(&dup.date),
            Cell::new(&dup.slot),
            Cell::new(dup.occurrence).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import finished:");
    println!("  Records read : {}", result.total_records);
    println!("  Inserted     : {}", result.inserted);
    println!("  Duplicates   : {}", result.skipped);
    if result.errors > 0 {
        println!("  Errors       : {}", result.errors);
    }
}
