//! Table and JSON printing for collection rows.

use anyhow::Result;
use convee_core::models::{columns_for, record_cell, Record, INQUIRY_COLUMNS};

/// Widest a single column may get
const MAX_COLUMN_WIDTH: usize = 40;

pub fn print_json(records: &[&Record]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

pub fn print_table(records: &[&Record], fields: &[String]) {
    if records.is_empty() {
        println!("No inquiries found.");
        return;
    }

    let columns = if fields.is_empty() {
        columns_for(records, INQUIRY_COLUMNS)
    } else {
        fields.to_vec()
    };

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| record_cell(r, c, MAX_COLUMN_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    println!("{}", format_row(&columns, &widths));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &rows {
        println!("{}", format_row(row, &widths));
    }
    println!("\n{} row(s)", rows.len());
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row_pads_by_chars() {
        let cells = vec!["Köln".to_string(), "1".to_string()];
        assert_eq!(format_row(&cells, &[6, 3]), "Köln   | 1  ");
    }
}
