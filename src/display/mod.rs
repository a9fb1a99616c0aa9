//! Terminal display utilities for CLI output.

pub mod tables;

pub use tables::{
    TableBuilder, create_description_table, create_neighbors_table, create_report_table,
    create_terms_table, format_resolution,
};
