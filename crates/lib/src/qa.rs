//! # Question/Answer Envelope Handling
//!
//! The model is asked for a single JSON object with four list-valued keys, one per
//! [`QaLevel`]. Its reply is free-form text, so everything here is defensive:
//!
//! 1.  **Extraction**: find the first brace-balanced JSON object in the text.
//!     Anything unparseable becomes the empty envelope.
//! 2.  **Validation**: repair missing or non-list level keys to empty lists.
//! 3.  **Flattening**: turn every entry with a `question` and an `answer` into a
//!     [`QaRecord`] tagged with its level label.
//! 4.  **Persistence**: write the records to a timestamped, BOM-prefixed CSV.

use crate::{
    constants::{timestamp_now, QA_FILE_PREFIX},
    errors::PromptError,
    types::{QaLevel, QaRecord},
};
use serde_json::{Map, Value};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// The parsed model reply: level keys mapped to lists of QA entries.
pub type QaEnvelope = Map<String, Value>;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// An envelope holding all four level keys, each mapped to an empty list.
pub fn empty_envelope() -> QaEnvelope {
    QaLevel::ALL
        .iter()
        .map(|level| (level.key().to_string(), Value::Array(Vec::new())))
        .collect()
}

/// Extracts the first JSON object embedded in free-form model output.
///
/// Candidates start at each `{` and end at the brace that balances it, ignoring
/// braces inside string literals. A brace that never closes is stepped over so
/// an object later in the text can still be found. The first candidate that
/// deserializes to a JSON object wins. When none does, the empty envelope is
/// returned.
pub fn extract_json_from_text(text: &str) -> QaEnvelope {
    let mut offset = 0;
    while let Some(relative_start) = text[offset..].find('{') {
        let start = offset + relative_start;
        let Some(length) = balanced_object_len(&text[start..]) else {
            offset = start + 1;
            continue;
        };
        let candidate = &text[start..start + length];
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => return map,
            Ok(_) => {}
            Err(e) => warn!("Skipping unparseable JSON candidate at byte {start}: {e}"),
        }
        offset = start + length;
    }

    warn!("No valid JSON object found in model response, using empty result.");
    empty_envelope()
}

/// Byte length of the brace-balanced region at the start of `text`, which must
/// begin with `{`. Returns `None` when the opening brace is never closed.
fn balanced_object_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Ensures every level key is present and list-valued.
///
/// Missing keys are inserted and non-list values replaced, both as empty lists.
/// Correctly shaped keys and any extra keys are left untouched. Returns the keys
/// that were repaired.
pub fn validate_envelope(envelope: &mut QaEnvelope) -> Vec<&'static str> {
    let mut repaired = Vec::new();
    for level in QaLevel::ALL {
        let key = level.key();
        match envelope.get(key) {
            Some(Value::Array(_)) => {}
            Some(_) => {
                warn!("'{key}' is not a list, replacing it with an empty list");
                envelope.insert(key.to_string(), Value::Array(Vec::new()));
                repaired.push(key);
            }
            None => {
                warn!("Missing key '{key}' in response");
                envelope.insert(key.to_string(), Value::Array(Vec::new()));
                repaired.push(key);
            }
        }
    }
    repaired
}

/// Flattens the envelope into CSV rows, in level order.
///
/// Entries that are not objects, or lack either `question` or `answer`, are dropped.
pub fn flatten_qa_pairs(envelope: &QaEnvelope) -> Vec<QaRecord> {
    let mut records = Vec::new();
    for level in QaLevel::ALL {
        let Some(Value::Array(items)) = envelope.get(level.key()) else {
            continue;
        };
        for item in items {
            let Some(entry) = item.as_object() else {
                continue;
            };
            if let (Some(question), Some(answer)) = (entry.get("question"), entry.get("answer")) {
                records.push(QaRecord {
                    question: value_to_text(question),
                    answer: value_to_text(answer),
                    level: level.label().to_string(),
                });
            }
        }
    }
    records
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Writes records to `path` as UTF-8 CSV with a byte-order mark and the
/// header `question,answer,level`.
pub fn write_qa_csv(path: &Path, records: &[QaRecord]) -> Result<(), PromptError> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Saves records to `<output_dir>/qa_pairs_<timestamp>.csv`, creating the
/// directory if needed.
///
/// Returns `Ok(None)` without writing a file when there are no records.
pub fn save_qa_csv(
    records: &[QaRecord],
    output_dir: impl AsRef<Path>,
) -> Result<Option<PathBuf>, PromptError> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    if records.is_empty() {
        warn!("No question/answer pairs to save, skipping CSV output.");
        return Ok(None);
    }

    let output_file = output_dir.join(format!("{QA_FILE_PREFIX}{}.csv", timestamp_now()));
    write_qa_csv(&output_file, records)?;
    info!(
        "Saved {} question/answer pairs to {}",
        records.len(),
        output_file.display()
    );
    Ok(Some(output_file))
}
