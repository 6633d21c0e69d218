//! Pretty output formatting.

use socialdb_core::social::Outcome;
use socialdb_core::storage::TableData;

/// Format an outcome for display.
pub fn format_outcome(outcome: &Outcome) -> String {
    let status = if outcome.success { "OK" } else { "FAILED" };
    match outcome.record_id {
        Some(id) => format!("{status}: {} (ID: {id})", outcome.message),
        None => format!("{status}: {}", outcome.message),
    }
}

/// Format a table listing as aligned columns.
pub fn format_table(data: &TableData) -> String {
    let mut output = format!("{} ({})\n", data.table, data.len());

    if data.is_empty() {
        output.push_str("No records found.");
        return output;
    }

    let rendered: Vec<Vec<String>> = data
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    let widths: Vec<usize> = data
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            rendered
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    output.push_str(&format_line(&data.columns, &widths));
    output.push('\n');
    output.push_str(&"-".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1)));
    for row in &rendered {
        output.push('\n');
        output.push_str(&format_line(row, &widths));
    }
    output
}

fn format_line(values: &[String], widths: &[usize]) -> String {
    values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
