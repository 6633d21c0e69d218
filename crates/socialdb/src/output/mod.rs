//! Output formatting functions.

pub mod json;
pub mod pretty;

use socialdb_core::social::Outcome;
use socialdb_core::storage::TableData;

use crate::cli::OutputFormat;

/// Format an operation outcome for output.
pub fn format_outcome(outcome: &Outcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_json(outcome),
        OutputFormat::Pretty => pretty::format_outcome(outcome),
    }
}

/// Format one table listing for output.
pub fn format_table(data: &TableData, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_json(data),
        OutputFormat::Pretty => pretty::format_table(data),
    }
}

/// Format several table listings for output.
pub fn format_tables(tables: &[TableData], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_json(&tables),
        OutputFormat::Pretty => tables
            .iter()
            .map(pretty::format_table)
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}
