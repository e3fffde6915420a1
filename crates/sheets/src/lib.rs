//! # `newsqa-sheets`: Tabular Data Handling
//!
//! This crate owns the CSV side of the pipeline: consolidating crawled article
//! files into `processed_data.csv`, and loading CSV tables for the question
//! generator.

pub mod consolidate;
pub mod tables;

pub use consolidate::{consolidate_directory, parse_content_file_name, ConsolidationReport};
pub use tables::{collect_csv_paths, read_csv_file, read_csv_files};

use std::path::PathBuf;
use thiserror::Error;

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("CSV file {0} has no header row")]
    MissingHeader(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
