use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Cells wider than this are shortened when a table sample is rendered.
const MAX_COLUMN_WIDTH: usize = 50;

/// One consolidated article, as written to `processed_data.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: u64,
    pub category: String,
    pub content: String,
}

/// An in-memory CSV table: a header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    /// Where the table was read from. Only used in log and prompt text.
    pub source: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(source: impl Into<PathBuf>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            source: source.into(),
            headers,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the first `limit` rows as a fixed-width text table.
    ///
    /// The first column is the 0-based row index. Values are right-aligned,
    /// embedded newlines are escaped and long cells end in `...`.
    pub fn render_sample(&self, limit: usize) -> String {
        if self.rows.is_empty() || limit == 0 {
            return format!("Empty table\nColumns: [{}]", self.headers.join(", "));
        }

        let sample: Vec<Vec<String>> = self
            .rows
            .iter()
            .take(limit)
            .map(|row| {
                (0..self.headers.len())
                    .map(|i| shorten_cell(row.get(i).map(String::as_str).unwrap_or("")))
                    .collect()
            })
            .collect();

        let index_width = (sample.len() - 1).to_string().len();
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                sample
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(sample.len() + 1);
        let mut header_line = " ".repeat(index_width);
        for (header, width) in self.headers.iter().zip(&widths) {
            header_line.push_str(&format!("  {header:>width$}"));
        }
        lines.push(header_line);

        for (index, row) in sample.iter().enumerate() {
            let mut line = format!("{index:<index_width$}");
            for (cell, width) in row.iter().zip(&widths) {
                line.push_str(&format!("  {cell:>width$}"));
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}

fn shorten_cell(value: &str) -> String {
    let escaped = value.replace('\r', "").replace('\n', "\\n");
    if escaped.chars().count() <= MAX_COLUMN_WIDTH {
        escaped
    } else {
        let kept: String = escaped.chars().take(MAX_COLUMN_WIDTH - 3).collect();
        format!("{kept}...")
    }
}

/// The four fixed tiers of generated question/answer pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QaLevel {
    BasicFact,
    ContextAugmented,
    Analytical,
    TimeSensitive,
}

impl QaLevel {
    /// All levels, in envelope order.
    pub const ALL: [QaLevel; 4] = [
        QaLevel::BasicFact,
        QaLevel::ContextAugmented,
        QaLevel::Analytical,
        QaLevel::TimeSensitive,
    ];

    /// The key holding this level's list in the model's JSON reply.
    pub fn key(self) -> &'static str {
        match self {
            QaLevel::BasicFact => "level1_qa",
            QaLevel::ContextAugmented => "level2_qa",
            QaLevel::Analytical => "level3_qa",
            QaLevel::TimeSensitive => "level4_qa",
        }
    }

    /// The human-readable label written to the `level` CSV column.
    pub fn label(self) -> &'static str {
        match self {
            QaLevel::BasicFact => "Cấp độ 1 - Câu hỏi cơ bản",
            QaLevel::ContextAugmented => "Cấp độ 2 - Câu hỏi cần ngữ cảnh",
            QaLevel::Analytical => "Cấp độ 3 - Câu hỏi cần phân tích phức tạp",
            QaLevel::TimeSensitive => "Cấp độ 4 - Câu hỏi nhạy cảm với thời gian",
        }
    }

    /// What the model is asked to produce for this level.
    pub fn description(self) -> &'static str {
        match self {
            QaLevel::BasicFact => {
                "Questions a language model can answer on its own (basic facts)"
            }
            QaLevel::ContextAugmented => {
                "Questions answered better when the model is given related documents (needs extra context)"
            }
            QaLevel::Analytical => {
                "Questions that can only be answered by analysing the data (complex analysis)"
            }
            QaLevel::TimeSensitive => {
                "Time-sensitive questions (the answer depends on when the question is asked)"
            }
        }
    }
}

impl fmt::Display for QaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A flattened question/answer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
    pub level: String,
}
