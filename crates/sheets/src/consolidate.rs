//! # Consolidation
//!
//! Stage two of the pipeline. Collects the `content_<N>.txt` files of one crawl
//! directory into a single `processed_data.csv` with columns
//! `id,category,content`, ordered by `N`.

use crate::SheetError;
use newsqa::constants::{CONTENT_FILE_EXTENSION, CONTENT_FILE_PREFIX, PROCESSED_DATA_FILE};
use newsqa::ArticleRecord;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const HEADER: [&str; 3] = ["id", "category", "content"];

/// Outcome of consolidating one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidationReport {
    pub output_path: PathBuf,
    pub records_written: usize,
    /// Files that looked like content files but could not be used, plus
    /// directory entries that could not be inspected.
    pub files_skipped: usize,
}

/// Returns `Some(Ok(n))` for `content_<n>.txt`, `Some(Err(raw))` when the name has
/// the shape but `raw` is not an integer, and `None` for unrelated names.
pub fn parse_content_file_name(file_name: &str) -> Option<Result<u64, String>> {
    let raw = file_name
        .strip_prefix(CONTENT_FILE_PREFIX)?
        .strip_suffix(CONTENT_FILE_EXTENSION)?;
    Some(raw.parse::<u64>().map_err(|_| raw.to_string()))
}

/// A directory entry reduced to its file name, path and whether it is a
/// regular file.
type EntryInfo = (String, PathBuf, bool);

fn entry_info(entry: io::Result<fs::DirEntry>) -> io::Result<EntryInfo> {
    let entry = entry?;
    let is_file = entry.file_type()?.is_file();
    Ok((
        entry.file_name().to_string_lossy().into_owned(),
        entry.path(),
        is_file,
    ))
}

/// Picks the content files out of a directory listing, sorted by file name.
/// Entries that cannot be inspected are logged and counted in the second value.
fn content_candidates(
    entries: impl IntoIterator<Item = io::Result<EntryInfo>>,
) -> (Vec<(String, PathBuf)>, usize) {
    let mut candidates = Vec::new();
    let mut unreadable = 0;
    for entry in entries {
        let (file_name, path, is_file) = match entry {
            Ok(info) => info,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {e}");
                unreadable += 1;
                continue;
            }
        };
        if is_file && parse_content_file_name(&file_name).is_some() {
            candidates.push((file_name, path));
        }
    }
    candidates.sort();
    (candidates, unreadable)
}

/// Consolidates every `content_<N>.txt` file directly inside `dir` into
/// `dir/processed_data.csv`, tagging each row with `category`.
///
/// Files whose `N` is not an integer, or that cannot be read as UTF-8 text,
/// are logged and skipped, as are directory entries that cannot be inspected. An existing `processed_data.csv` is overwritten.
/// A directory without content files still produces a header-only CSV.
pub fn consolidate_directory(
    dir: &Path,
    category: &str,
) -> Result<ConsolidationReport, SheetError> {
    if !dir.is_dir() {
        return Err(SheetError::NotADirectory(dir.to_path_buf()));
    }

    let (candidates, mut files_skipped) =
        content_candidates(fs::read_dir(dir)?.map(entry_info));

    let mut records = Vec::new();
    for (file_name, path) in candidates {
        let id = match parse_content_file_name(&file_name) {
            Some(Ok(id)) => id,
            _ => {
                warn!("Skipping {file_name}: file number is not an integer");
                files_skipped += 1;
                continue;
            }
        };
        match fs::read_to_string(&path) {
            Ok(text) => records.push(ArticleRecord {
                id,
                category: category.to_string(),
                content: text.trim().to_string(),
            }),
            Err(e) => {
                warn!("Skipping {file_name}: {e}");
                files_skipped += 1;
            }
        }
    }
    records.sort_by_key(|record| record.id);

    let output_path = dir.join(PROCESSED_DATA_FILE);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&output_path)?;
    writer.write_record(HEADER)?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(
        "Consolidated {} files into {}",
        records.len(),
        output_path.display()
    );
    Ok(ConsolidationReport {
        output_path,
        records_written: records.len(),
        files_skipped,
    })
}
