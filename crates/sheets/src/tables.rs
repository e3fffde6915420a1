//! # CSV Table Loading
//!
//! Reads the CSV inputs of the question generator into [`DataTable`]s.

use crate::SheetError;
use newsqa::DataTable;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Reads one CSV file with a header row.
///
/// Rows shorter than the header are padded with empty cells; extra cells are
/// dropped.
pub fn read_csv_file(path: &Path) -> Result<DataTable, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(SheetError::MissingHeader(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().take(headers.len()).map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(DataTable::new(path, headers, rows))
}

/// Expands the inputs into a list of CSV files. A directory contributes its
/// `*.csv` files, sorted by name, without descending further.
pub fn collect_csv_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            paths.push(input.clone());
            continue;
        }
        match fs::read_dir(input) {
            Ok(entries) => {
                let mut found: Vec<PathBuf> = entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.path())
                    .filter(|path| {
                        path.is_file()
                            && path
                                .extension()
                                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
                    })
                    .collect();
                found.sort();
                paths.extend(found);
            }
            Err(e) => warn!("Could not list {}: {e}", input.display()),
        }
    }
    paths
}

/// Loads every CSV named by `inputs`, skipping the ones that fail to load.
pub fn read_csv_files(inputs: &[PathBuf]) -> Vec<DataTable> {
    let mut tables = Vec::new();
    for path in collect_csv_paths(inputs) {
        match read_csv_file(&path) {
            Ok(table) => {
                info!(
                    "Read {}: {} rows, {} columns",
                    path.display(),
                    table.rows.len(),
                    table.headers.len()
                );
                tables.push(table);
            }
            Err(e) => warn!("Error reading file {}: {e}", path.display()),
        }
    }
    tables
}
