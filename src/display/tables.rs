//! Table formatting utilities for structured output.

use comfy_table::{Attribute, Cell, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use crate::pipeline::BuildReport;
use crate::search::{Description, MatchStrategy, Resolution, SimilarItems, TermMatch};

/// Builder for creating formatted tables.
pub struct TableBuilder {
    table: Table,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    /// Create a new table builder.
    pub fn new() -> Self {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.apply_modifier(UTF8_ROUND_CORNERS);
        Self { table }
    }

    /// Set the table headers.
    pub fn set_headers(mut self, headers: Vec<&str>) -> Self {
        let header_cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect();
        self.table.set_header(header_cells);
        self
    }

    /// Add a row to the table.
    pub fn add_row(mut self, row: Vec<String>) -> Self {
        self.table.add_row(row);
        self
    }

    /// Build and return the formatted table.
    pub fn build(self) -> String {
        self.table.to_string()
    }
}

/// One line telling the user which item a query was answered for.
pub fn format_resolution(query: &str, resolution: &Resolution) -> String {
    match resolution.strategy {
        MatchStrategy::Exact => format!("'{}'", resolution.name),
        MatchStrategy::Substring => format!(
            "'{}' (contains '{query}', best of {})",
            resolution.name, resolution.candidates
        ),
        MatchStrategy::Fuzzy => format!(
            "'{}' (closest to '{query}', best of {})",
            resolution.name, resolution.candidates
        ),
    }
}

/// Ranked neighbours of one item.
pub fn create_neighbors_table(result: &SimilarItems) -> String {
    result
        .neighbors
        .iter()
        .enumerate()
        .fold(
            TableBuilder::new().set_headers(vec!["#", "Item", "Similarity", "Reviews"]),
            |table, (rank, neighbor)| {
                table.add_row(vec![
                    (rank + 1).to_string(),
                    neighbor.name.clone(),
                    neighbor.score.to_string(),
                    neighbor.reviews.to_string(),
                ])
            },
        )
        .build()
}

/// Closest vocabulary terms per attribute, one row per attribute.
pub fn create_description_table(description: &Description) -> String {
    description
        .terms
        .iter()
        .fold(
            TableBuilder::new().set_headers(vec!["Attribute", "Terms"]),
            |table, (attribute, terms)| {
                table.add_row(vec![attribute.label().to_string(), terms.join(", ")])
            },
        )
        .build()
}

/// Vocabulary neighbours of a term.
pub fn create_terms_table(matches: &[TermMatch]) -> String {
    matches
        .iter()
        .fold(
            TableBuilder::new().set_headers(vec!["Term", "Similarity"]),
            |table, m| table.add_row(vec![m.term.clone(), m.score.to_string()]),
        )
        .build()
}

/// Summary of one pipeline build.
pub fn create_report_table(report: &BuildReport) -> String {
    let rows = [
        ("Reviews read", report.reviews),
        ("Incomplete", report.incomplete),
        ("No known tokens", report.empty_embeddings),
        ("Other failures", report.failed),
        ("Admitted", report.admitted),
        ("Items", report.items),
        ("Vocabulary", report.vocabulary),
        ("Dimension", report.dimension),
    ];

    rows.into_iter()
        .fold(
            TableBuilder::new().set_headers(vec!["Metric", "Value"]),
            |table, (metric, value)| table.add_row(vec![metric.to_string(), value.to_string()]),
        )
        .build()
}
